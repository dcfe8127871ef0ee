//! Tree scanning: convertible files and directory components under a target.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};
use crate::exclude::ExcludeConfig;

/// The only extensions that are scanned, renamed, or have imports edited.
pub const SOURCE_EXTENSIONS: &[&str] = &["tsx", "jsx"];

/// Base name of a directory component's marker file.
pub const INDEX_STEM: &str = "index";

/// True when `path` has a recognized source extension.
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// True for `index.tsx` / `index.jsx`.
pub fn is_index_file(path: &Path) -> bool {
    is_source_file(path) && path.file_stem().and_then(|s| s.to_str()) == Some(INDEX_STEM)
}

/// Split a file name into base name and extension (`Button.tsx` → `("Button", "tsx")`).
pub fn split_file_name(file_name: &str) -> Option<(&str, &str)> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some((stem, ext))
}

// ============================================================================
// Walker
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEntry {
    Dir(PathBuf),
    File(PathBuf),
}

impl WalkEntry {
    pub fn path(&self) -> &Path {
        match self {
            WalkEntry::Dir(p) | WalkEntry::File(p) => p,
        }
    }
}

/// Lazy depth-first walk below a root, in lexical order.
///
/// Excluded directories are yielded neither themselves nor their contents.
/// Symlinks are not followed. A subdirectory that cannot be listed is
/// reported as an `Err` item and the walk continues with its siblings.
pub struct Walker<'a> {
    exclusions: &'a ExcludeConfig,
    stack: Vec<WalkEntry>,
}

impl<'a> Walker<'a> {
    /// Fails when `root` itself cannot be listed.
    pub fn new(root: &Path, exclusions: &'a ExcludeConfig) -> Result<Self> {
        let mut walker = Self {
            exclusions,
            stack: Vec::new(),
        };
        walker.push_children(root).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("read_dir {}", root.display())))
        })?;
        Ok(walker)
    }

    fn push_children(&mut self, dir: &Path) -> std::io::Result<()> {
        let mut children = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();
            if file_type.is_dir() {
                let name = entry.file_name();
                if self.exclusions.is_excluded_dir(&name.to_string_lossy()) {
                    continue;
                }
                children.push(WalkEntry::Dir(path));
            } else if file_type.is_file() {
                children.push(WalkEntry::File(path));
            }
        }
        // Reverse lexical so the stack pops in lexical order.
        children.sort_by(|a, b| b.path().cmp(a.path()));
        self.stack.extend(children);
        Ok(())
    }
}

impl Iterator for Walker<'_> {
    type Item = Result<WalkEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        if let WalkEntry::Dir(dir) = &entry {
            if let Err(e) = self.push_children(dir) {
                return Some(Err(Error::internal_io(
                    e.to_string(),
                    Some(format!("read_dir {}", dir.display())),
                )));
            }
        }
        Some(Ok(entry))
    }
}

// ============================================================================
// Scan
// ============================================================================

/// Convertible entities found under one root.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    /// Source files other than index files.
    pub files: Vec<PathBuf>,
    /// Directories directly holding exactly one index file.
    pub dir_components: Vec<PathBuf>,
    /// Subdirectories that could not be listed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Number of index files directly inside `dir`.
pub fn count_index_files(dir: &Path) -> usize {
    SOURCE_EXTENSIONS
        .iter()
        .filter(|ext| dir.join(format!("{}.{}", INDEX_STEM, ext)).is_file())
        .count()
}

/// Scan `root` for plain files and directory components.
///
/// `root` itself is never reported as a directory component.
pub fn scan(root: &Path, exclusions: &ExcludeConfig) -> Result<ScanResult> {
    let mut result = ScanResult::default();

    for entry in Walker::new(root, exclusions)? {
        match entry {
            Ok(WalkEntry::File(path)) => {
                if is_source_file(&path) && !is_index_file(&path) {
                    result.files.push(path);
                }
            }
            Ok(WalkEntry::Dir(path)) => {
                if count_index_files(&path) == 1 {
                    result.dir_components.push(path);
                }
            }
            Err(err) => result.warnings.push(err.to_string()),
        }
    }

    Ok(result)
}

/// Every source file below `root`, index files included.
///
/// Used as the candidate set for import rewriting. Unlistable subdirectories
/// are skipped.
pub fn source_files(root: &Path, exclusions: &ExcludeConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in Walker::new(root, exclusions)? {
        if let Ok(WalkEntry::File(path)) = entry {
            if is_source_file(&path) {
                files.push(path);
            }
        }
    }
    Ok(files)
}
