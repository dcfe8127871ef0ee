use std::collections::BTreeSet;

/// Uppercase tokens treated as a single word during case conversion.
const BUILTIN_ACRONYMS: &[&str] = &[
    "API", "FAQ", "UI", "ID", "URL", "SDK", "CSS", "HTML", "HTTP", "HTTPS", "JSON", "XML", "JWT",
    "SEO", "DX", "AI", "CTA",
];

/// Read-only acronym table shared by both conversion directions.
///
/// Entries are stored uppercased; lookups expect an uppercase probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcronymSet {
    entries: BTreeSet<String>,
}

impl AcronymSet {
    pub fn builtin() -> Self {
        Self::new(BUILTIN_ACRONYMS.iter().copied())
    }

    pub fn new<I, S>(acronyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = acronyms
            .into_iter()
            .map(|a| a.as_ref().trim().to_ascii_uppercase())
            .filter(|a| !a.is_empty())
            .collect();
        Self { entries }
    }

    /// Built-in table plus `extra` (e.g. acronyms from the exclusion config).
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::builtin();
        for acronym in extra {
            let acronym = acronym.as_ref().trim().to_ascii_uppercase();
            if !acronym.is_empty() {
                set.entries.insert(acronym);
            }
        }
        set
    }

    pub fn contains(&self, upper: &str) -> bool {
        self.entries.contains(upper)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest first, so segmentation prefers `HTTPS` over `HTTP`.
    pub(crate) fn by_length_desc(&self) -> Vec<&str> {
        let mut entries: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        entries.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        entries
    }
}

impl Default for AcronymSet {
    fn default() -> Self {
        Self::builtin()
    }
}
