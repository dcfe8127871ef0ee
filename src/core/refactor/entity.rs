use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::imports;
use crate::case::{AcronymSet, Direction};
use crate::exclude::ExcludeConfig;
use crate::scan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    File,
    Directory,
}

/// A file or directory component scheduled for rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionEntity {
    pub kind: EntityKind,
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    /// Base name without extension.
    pub old_name: String,
    pub new_name: String,
}

/// Why an entity was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    WrongConvention,
    ExcludedName { pattern: String },
    ExcludedImport { import: String },
    DestinationExists { path: PathBuf },
    Unchanged,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::WrongConvention => write!(f, "name is not in the source convention"),
            SkipReason::ExcludedName { pattern } => {
                write!(f, "name matches exclusion pattern '{}'", pattern)
            }
            SkipReason::ExcludedImport { import } => {
                write!(f, "imports excluded path '{}'", import)
            }
            SkipReason::DestinationExists { path } => {
                write!(f, "destination already exists: {}", path.display())
            }
            SkipReason::Unchanged => write!(f, "converted name is identical"),
        }
    }
}

pub type Planned = std::result::Result<ConversionEntity, SkipReason>;

/// Decides, without touching the filesystem, whether and how to rename an entity.
pub struct Planner<'a> {
    pub direction: Direction,
    pub acronyms: &'a AcronymSet,
    pub exclusions: &'a ExcludeConfig,
}

impl Planner<'_> {
    /// Plan a plain source file. Checks, in order: name exclusion, import
    /// exclusion, source convention, unchanged name, destination collision.
    pub fn plan_file(&self, path: &Path) -> Planned {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(SkipReason::WrongConvention)?;
        let (stem, ext) = scan::split_file_name(file_name).ok_or(SkipReason::WrongConvention)?;

        self.check_name_exclusion(file_name)?;
        if let Some(import) = imports::find_excluded_import(path, &self.exclusions.exclude_imports)
        {
            return Err(SkipReason::ExcludedImport { import });
        }

        let new_name = self.convert_name(stem)?;
        let new_path = path.with_file_name(format!("{}.{}", new_name, ext));
        check_destination(path, &new_path)?;

        Ok(ConversionEntity {
            kind: EntityKind::File,
            old_path: path.to_path_buf(),
            new_path,
            old_name: stem.to_string(),
            new_name,
        })
    }

    /// Plan a directory component, named after the directory itself.
    pub fn plan_directory(&self, path: &Path) -> Planned {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(SkipReason::WrongConvention)?;

        self.check_name_exclusion(name)?;

        let new_name = self.convert_name(name)?;
        let new_path = path.with_file_name(&new_name);
        check_destination(path, &new_path)?;

        Ok(ConversionEntity {
            kind: EntityKind::Directory,
            old_path: path.to_path_buf(),
            new_path,
            old_name: name.to_string(),
            new_name,
        })
    }

    fn check_name_exclusion(&self, name: &str) -> std::result::Result<(), SkipReason> {
        match self.exclusions.matching_file_pattern(name) {
            Some(pattern) => Err(SkipReason::ExcludedName {
                pattern: pattern.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn convert_name(&self, name: &str) -> std::result::Result<String, SkipReason> {
        let converted = self
            .direction
            .convert(name, self.acronyms)
            .ok_or(SkipReason::WrongConvention)?;
        if converted == name {
            return Err(SkipReason::Unchanged);
        }
        Ok(converted)
    }
}

/// Destinations taken by earlier entities of the same pass.
#[derive(Debug, Default)]
pub struct ClaimedDestinations(HashSet<PathBuf>);

impl ClaimedDestinations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pass a plan through, turning a second claim on a destination into a skip.
    pub fn claim(&mut self, planned: Planned) -> Planned {
        let entity = planned?;
        if !self.0.insert(entity.new_path.clone()) {
            return Err(SkipReason::DestinationExists {
                path: entity.new_path,
            });
        }
        Ok(entity)
    }
}

fn check_destination(from: &Path, to: &Path) -> std::result::Result<(), SkipReason> {
    if to.symlink_metadata().is_ok() && !same_file(from, to) {
        return Err(SkipReason::DestinationExists {
            path: to.to_path_buf(),
        });
    }
    Ok(())
}

/// True when both paths resolve to the same inode, as with a case-only
/// rename on a case-insensitive filesystem.
#[cfg(unix)]
pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(x), Ok(y)) => x.dev() == y.dev() && x.ino() == y.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
pub(crate) fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}
