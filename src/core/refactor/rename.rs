//! Filesystem renames for planned entities.
//!
//! Files move with a single rename. Directories move in two phases through a
//! hidden, uniquely named sibling so a case-only rename never collides with
//! itself on a case-insensitive filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::entity::{ConversionEntity, EntityKind};
use crate::error::{Error, Result};

/// Rename `entity` on disk, or only report the destination when `dry_run`.
pub fn rename_entity(entity: &ConversionEntity, dry_run: bool) -> Result<PathBuf> {
    if dry_run {
        return Ok(entity.new_path.clone());
    }

    match entity.kind {
        EntityKind::File => fs::rename(&entity.old_path, &entity.new_path)
            .map_err(|e| rename_error(e, &entity.old_path, &entity.new_path))?,
        EntityKind::Directory => move_directory(&entity.old_path, &entity.new_path)?,
    }

    Ok(entity.new_path.clone())
}

/// Move `from` to `to` via a temporary sibling.
///
/// If the second phase fails the directory is moved back to `from`. When
/// that also fails the error names the temporary path holding the data.
pub fn move_directory(from: &Path, to: &Path) -> Result<()> {
    let temp = temp_sibling(from)?;

    fs::rename(from, &temp).map_err(|e| rename_error(e, from, &temp))?;

    if let Err(err) = fs::rename(&temp, to) {
        return match fs::rename(&temp, from) {
            Ok(()) => Err(rename_error(err, from, to)
                .with_hint(format!("Restored original directory {}", from.display()))),
            Err(restore_err) => Err(rename_error(err, from, to).with_hint(format!(
                "Restore failed ({}); contents remain at {}",
                restore_err,
                temp.display()
            ))),
        };
    }

    Ok(())
}

fn temp_sibling(path: &Path) -> Result<PathBuf> {
    let (Some(parent), Some(name)) = (path.parent(), path.file_name()) else {
        return Err(Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some("move directory".to_string()),
        ));
    };
    Ok(parent.join(format!(
        ".{}-{}.recase-tmp",
        name.to_string_lossy(),
        Uuid::new_v4().simple()
    )))
}

fn rename_error(err: std::io::Error, from: &Path, to: &Path) -> Error {
    Error::internal_io(
        err.to_string(),
        Some(format!("rename {} -> {}", from.display(), to.display())),
    )
}

/// Order directory entities so children are renamed before their parents.
pub fn sort_deepest_first(entities: &mut [ConversionEntity]) {
    entities.sort_by(|a, b| {
        b.old_path
            .components()
            .count()
            .cmp(&a.old_path.components().count())
            .then_with(|| a.old_path.cmp(&b.old_path))
    });
}
