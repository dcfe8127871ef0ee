//! Project layout: root detection, target directory discovery and per-directory
//! naming statistics.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::case::{classify, Convention};
use crate::error::{Error, Result};
use crate::exclude::ExcludeConfig;
use crate::scan::{self, Walker, WalkEntry};

/// Entries whose presence marks a project root.
const ROOT_MARKERS: &[&str] = &["apps", "packages", "package.json", "go.mod"];

/// Top-level trees searched for target directories.
const SEARCH_PREFIXES: &[&str] = &["apps", "packages"];

/// Path fragments marking component-like directories.
const COMPONENT_FRAGMENTS: &[&str] = &["/components/", "/features/", "/libs/", "/utils/", "/hooks/"];

/// Walk upward from `start` to the first directory holding a root marker.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if ROOT_MARKERS.iter().any(|marker| dir.join(marker).exists()) {
            return Ok(dir.to_path_buf());
        }
        current = dir.parent();
    }
    Err(Error::project_root_not_found(start.display().to_string()))
}

/// Component-like or route directories below `apps/` and `packages/` that
/// directly contain a source file.
///
/// Returned relative to `root`, sorted, with nested targets folded into their
/// nearest target ancestor.
pub fn discover_target_directories(
    root: &Path,
    exclusions: &ExcludeConfig,
) -> Result<Vec<PathBuf>> {
    let mut found: Vec<String> = Vec::new();

    for prefix in SEARCH_PREFIXES {
        let base = root.join(prefix);
        if !base.is_dir() {
            continue;
        }
        for entry in Walker::new(&base, exclusions)? {
            let dir = match entry {
                Ok(WalkEntry::Dir(dir)) => dir,
                Ok(WalkEntry::File(_)) => continue,
                Err(err) => {
                    crate::log_status!("scan", "Warning: {}", err);
                    continue;
                }
            };
            let Some(rel) = relative_slash_path(root, &dir) else {
                continue;
            };
            if is_target_path(&rel) && has_direct_source_file(&dir) {
                found.push(rel);
            }
        }
    }

    found.sort();
    found.dedup();
    Ok(remove_child_directories(found)
        .into_iter()
        .map(PathBuf::from)
        .collect())
}

fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

/// Whether a root-relative, slash-separated path names a target directory.
fn is_target_path(rel: &str) -> bool {
    let name = rel.rsplit('/').next().unwrap_or(rel);
    if name == "components" {
        return true;
    }

    let parts: Vec<&str> = rel.split('/').collect();
    if parts.len() == 3 && parts[0] == "apps" && parts[2] == "app" {
        return true;
    }
    if rel == "packages/ui/src" {
        return true;
    }

    if rel.ends_with("/app")
        || rel.ends_with("/pages")
        || rel.contains("/app/")
        || rel.contains("/pages/")
    {
        return true;
    }

    COMPONENT_FRAGMENTS.iter().any(|frag| rel.contains(frag))
}

fn has_direct_source_file(dir: &Path) -> bool {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };
    entries.flatten().any(|entry| {
        entry.file_type().is_ok_and(|t| t.is_file()) && scan::is_source_file(&entry.path())
    })
}

/// Drop any path whose ancestor is also in the (sorted) list.
fn remove_child_directories(sorted: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for dir in sorted {
        let is_child = kept
            .iter()
            .any(|parent| dir.starts_with(parent.as_str()) && dir[parent.len()..].starts_with('/'));
        if !is_child {
            kept.push(dir);
        }
    }
    kept
}

// ============================================================================
// Statistics
// ============================================================================

/// Naming-convention counts for one directory tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectoryStats {
    /// Source files, index files included.
    pub total_files: usize,
    pub dir_components: usize,
    pub pascal_count: usize,
    pub kebab_count: usize,
    pub other_count: usize,
}

impl DirectoryStats {
    fn record(&mut self, name: &str) {
        match classify(name) {
            Some(Convention::Pascal) => self.pascal_count += 1,
            Some(Convention::Kebab) => self.kebab_count += 1,
            None => self.other_count += 1,
        }
    }

    pub fn add(&mut self, other: &DirectoryStats) {
        self.total_files += other.total_files;
        self.dir_components += other.dir_components;
        self.pascal_count += other.pascal_count;
        self.kebab_count += other.kebab_count;
        self.other_count += other.other_count;
    }
}

/// Count source files and classify every convertible name under `dir`.
pub fn analyze_directory(dir: &Path, exclusions: &ExcludeConfig) -> Result<DirectoryStats> {
    let scanned = scan::scan(dir, exclusions)?;
    let mut stats = DirectoryStats {
        total_files: scan::source_files(dir, exclusions)?.len(),
        dir_components: scanned.dir_components.len(),
        ..DirectoryStats::default()
    };

    for file in &scanned.files {
        if let Some((stem, _)) = file
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(scan::split_file_name)
        {
            stats.record(stem);
        }
    }
    for component in &scanned.dir_components {
        if let Some(name) = component.file_name().and_then(|n| n.to_str()) {
            stats.record(name);
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn finds_root_from_nested_directory() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "package.json");
        let nested = dir.path().join("apps/web/src");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested).unwrap(), dir.path());

        touch(dir.path(), "apps/web/src/package.json");
        assert_eq!(find_project_root(&nested).unwrap(), nested);
    }

    #[test]
    fn target_path_patterns() {
        assert!(is_target_path("packages/ui/components"));
        assert!(is_target_path("apps/web/app"));
        assert!(is_target_path("packages/ui/src"));
        assert!(is_target_path("apps/web/src/pages"));
        assert!(is_target_path("apps/web/src/features/auth"));
        assert!(is_target_path("packages/shared/hooks/form/inputs"));
        assert!(!is_target_path("apps/web/src"));
        assert!(!is_target_path("packages/config"));
    }

    #[test]
    fn child_directories_fold_into_parent() {
        let dirs = vec![
            "apps/web/app".to_string(),
            "apps/web/app/components".to_string(),
            "apps/web/application".to_string(),
            "packages/ui/src".to_string(),
        ];
        assert_eq!(
            remove_child_directories(dirs),
            vec!["apps/web/app", "apps/web/application", "packages/ui/src"]
        );
    }

    #[test]
    fn discovers_targets_holding_source_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "apps/web/app/page.tsx");
        touch(root, "apps/web/app/components/Header.tsx");
        touch(root, "packages/ui/src/Button.tsx");
        touch(root, "packages/ui/components/.gitkeep");
        touch(root, "packages/ui/node_modules/components/Lib.tsx");

        let dirs = discover_target_directories(root, &ExcludeConfig::default()).unwrap();
        assert_eq!(
            dirs,
            vec![PathBuf::from("apps/web/app"), PathBuf::from("packages/ui/src")]
        );
    }

    #[test]
    fn missing_search_prefixes_are_ignored() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "package.json");
        let dirs = discover_target_directories(dir.path(), &ExcludeConfig::default()).unwrap();
        assert!(dirs.is_empty());
    }

    #[test]
    fn analyze_counts_files_and_components() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "Button.tsx");
        touch(root, "user-card.tsx");
        touch(root, "use_thing.jsx");
        touch(root, "IconButton/index.tsx");

        let stats = analyze_directory(root, &ExcludeConfig::default()).unwrap();
        assert_eq!(
            stats,
            DirectoryStats {
                total_files: 4,
                dir_components: 1,
                pascal_count: 2,
                kebab_count: 1,
                other_count: 1,
            }
        );
    }
}
