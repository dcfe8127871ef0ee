//! Exclusion configuration: which files, imports and directories a
//! conversion pass must leave alone.
//!
//! Loaded from `recase.yaml` at the project root (or an explicit path) and
//! merged with built-in defaults. Immutable once a run starts.

use std::fs;
use std::path::{Path, PathBuf};

use glob_match::glob_match;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Config file names looked up at the project root, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["recase.yaml", "recase.yml"];

/// Directories never visited regardless of configuration.
pub const SYSTEM_EXCLUDED_DIRS: &[&str] = &["node_modules", "dist", "build", ".git", ".next"];

/// Exclusion lists plus extra acronyms, as read from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludeConfig {
    /// Substrings matched against file and directory-component names.
    #[serde(default = "default_exclude_files")]
    pub exclude_files: Vec<String>,

    /// Substrings matched against import paths inside a candidate file.
    #[serde(default)]
    pub exclude_imports: Vec<String>,

    /// Directory names (or glob patterns) pruned from every walk.
    #[serde(default = "default_exclude_directories")]
    pub exclude_directories: Vec<String>,

    /// Additional acronyms merged into the built-in table.
    #[serde(default)]
    pub acronyms: Vec<String>,
}

impl Default for ExcludeConfig {
    fn default() -> Self {
        Self {
            exclude_files: default_exclude_files(),
            exclude_imports: Vec::new(),
            exclude_directories: default_exclude_directories(),
            acronyms: Vec::new(),
        }
    }
}

fn default_exclude_files() -> Vec<String> {
    vec![".test.".to_string(), ".spec.".to_string(), ".stories.".to_string()]
}

fn default_exclude_directories() -> Vec<String> {
    vec![
        "__tests__".to_string(),
        "__mocks__".to_string(),
        "__snapshots__".to_string(),
        "coverage".to_string(),
        "public".to_string(),
    ]
}

impl ExcludeConfig {
    /// True for system directories, dot-directories and configured excludes.
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        if SYSTEM_EXCLUDED_DIRS.contains(&name) {
            return true;
        }
        if name.starts_with('.') && name != "." && name != ".." {
            return true;
        }
        self.exclude_directories
            .iter()
            .any(|pattern| pattern == name || glob_match(pattern, name))
    }

    /// First configured file pattern contained in `name`, if any.
    pub fn matching_file_pattern(&self, name: &str) -> Option<&str> {
        self.exclude_files
            .iter()
            .map(String::as_str)
            .find(|pattern| !pattern.is_empty() && name.contains(pattern))
    }
}

/// Where the active exclusion config came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum ConfigSource {
    Explicit(PathBuf),
    Discovered(PathBuf),
    Builtin,
}

/// Parse an exclusion config file. An empty file yields the defaults.
pub fn load_from_file(path: &Path) -> Result<ExcludeConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("read {}", path.display())))
    })?;

    parse(&content).map_err(|e| Error::config_invalid_yaml(path.display().to_string(), e))
}

fn parse(content: &str) -> std::result::Result<ExcludeConfig, serde_yml::Error> {
    if content.trim().is_empty() {
        return Ok(ExcludeConfig::default());
    }
    serde_yml::from_str(content)
}

/// First `recase.yaml` / `recase.yml` present at the project root.
pub fn discover(project_root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| project_root.join(name))
        .find(|path| path.is_file())
}

/// Resolve the config for a run.
///
/// An explicit path must load. A discovered file that fails to load is
/// reported and replaced by the built-in defaults.
pub fn resolve(
    project_root: &Path,
    explicit: Option<&Path>,
) -> Result<(ExcludeConfig, ConfigSource)> {
    if let Some(path) = explicit {
        let config = load_from_file(path)?;
        return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
    }

    match discover(project_root) {
        Some(path) => match load_from_file(&path) {
            Ok(config) => {
                crate::log_status!("config", "Loaded exclusions from {}", path.display());
                Ok((config, ConfigSource::Discovered(path)))
            }
            Err(err) => {
                crate::log_status!(
                    "config",
                    "Warning: {}; using built-in exclusions",
                    err
                );
                Ok((ExcludeConfig::default(), ConfigSource::Builtin))
            }
        },
        None => Ok((ExcludeConfig::default(), ConfigSource::Builtin)),
    }
}
