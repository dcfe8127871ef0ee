use super::AcronymSet;

/// Convert a PascalCase name to kebab-case, keeping recognized acronyms whole.
///
/// `UserAPIService` becomes `user-api-service`, `FAQPage` becomes `faq-page`.
/// An uppercase run that is not an acronym is split into acronyms when it can
/// be (`APIURLID` becomes `api-url-id`), otherwise it is kept as one word with
/// only its first letter lowered.
pub fn to_kebab_case(name: &str, acronyms: &AcronymSet) -> String {
    if name == "Index" {
        return "index".to_string();
    }

    let chars: Vec<char> = name.chars().collect();

    if chars.len() > 1
        && chars[0].is_ascii_uppercase()
        && chars[1..].iter().all(|c| c.is_ascii_lowercase())
    {
        return name.to_ascii_lowercase();
    }

    let candidates = acronyms.by_length_desc();
    let mut out = String::with_capacity(name.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if !c.is_ascii_uppercase() {
            out.push(c);
            i += 1;
            continue;
        }

        let end = uppercase_run_end(&chars, i);
        let run: String = chars[i..end].iter().collect();

        for (n, token) in run_tokens(&run, acronyms, &candidates).into_iter().enumerate() {
            if i > 0 || n > 0 {
                out.push('-');
            }
            match token {
                RunToken::Acronym(a) => out.push_str(&a.to_ascii_lowercase()),
                RunToken::Word(w) => {
                    let mut wc = w.chars();
                    if let Some(first) = wc.next() {
                        out.push(first.to_ascii_lowercase());
                        out.push_str(wc.as_str());
                    }
                }
            }
        }

        i = end;
    }

    out
}

/// Convert a kebab-case name to PascalCase, uppercasing recognized acronyms.
///
/// Empty tokens from doubled hyphens are dropped. A single-letter first token
/// is capitalized even if it is registered as an acronym.
pub fn to_pascal_case(name: &str, acronyms: &AcronymSet) -> String {
    name.split('-')
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(i, token)| {
            let upper = token.to_ascii_uppercase();
            if acronyms.contains(&upper) && (i > 0 || token.len() > 1) {
                upper
            } else {
                capitalize(token)
            }
        })
        .collect()
}

enum RunToken<'a> {
    Acronym(&'a str),
    Word(&'a str),
}

/// End (exclusive) of the uppercase run starting at `start`.
///
/// When the run is followed by a lowercase letter, its last capital belongs to
/// the next word: in `UserAPIService` the run `APIS` backs off to `API`.
fn uppercase_run_end(chars: &[char], start: usize) -> usize {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_uppercase() {
        end += 1;
    }
    if end > start + 1 && end < chars.len() && chars[end].is_ascii_lowercase() {
        end -= 1;
    }
    end
}

fn run_tokens<'a>(run: &'a str, acronyms: &AcronymSet, candidates: &[&str]) -> Vec<RunToken<'a>> {
    if run.len() > 1 {
        if acronyms.contains(run) {
            return vec![RunToken::Acronym(run)];
        }
        if let Some(parts) = segment_acronyms(run, candidates) {
            return parts.into_iter().map(RunToken::Acronym).collect();
        }
    }
    vec![RunToken::Word(run)]
}

/// Split `run` entirely into acronyms, longest candidate first, backtracking.
fn segment_acronyms<'a>(run: &'a str, candidates: &[&str]) -> Option<Vec<&'a str>> {
    if run.is_empty() {
        return Some(Vec::new());
    }
    for acronym in candidates {
        if let Some(rest) = run.strip_prefix(*acronym) {
            if let Some(mut tail) = segment_acronyms(rest, candidates) {
                tail.insert(0, &run[..acronym.len()]);
                return Some(tail);
            }
        }
    }
    None
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().to_string() + chars.as_str(),
    }
}
