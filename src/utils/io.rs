//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read a source file, mapping failures to `Error::internal_io`.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("{} {}", operation, path.display())),
        )
    })
}

/// Replace a file's content through a hidden sibling temp file and a rename.
///
/// Readers see either the old content or the new content, never a partial
/// write. An existing file keeps its permissions. The temp file is removed if
/// anything after its creation fails.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let context = || Some(format!("{} {}", operation, path.display()));

    let (Some(parent), Some(filename)) = (path.parent(), path.file_name()) else {
        return Err(Error::internal_io(
            format!("Invalid path: {}", path.display()),
            context(),
        ));
    };

    let tmp_path = parent.join(format!(".{}.recase-tmp", filename.to_string_lossy()));

    let permissions = fs::metadata(path).ok().map(|m| m.permissions());

    fs::write(&tmp_path, content).map_err(|e| Error::internal_io(e.to_string(), context()))?;

    if let Some(permissions) = permissions {
        if let Err(e) = fs::set_permissions(&tmp_path, permissions) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::internal_io(e.to_string(), context()));
        }
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::internal_io(e.to_string(), context()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "import {{ Button }} from './Button';").unwrap();

        let content = read_file(temp.path(), "read").unwrap();
        assert!(content.contains("./Button"));
    }

    #[test]
    fn read_file_error_names_the_path() {
        let err = read_file(Path::new("/nonexistent/Card.tsx"), "read").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert!(err.to_string().contains("/nonexistent/Card.tsx"));
    }

    #[test]
    fn atomic_write_replaces_content_without_leftovers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Card.tsx");
        fs::write(&path, "old").unwrap();

        write_file_atomic(&path, "new", "rewrite imports in").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn atomic_write_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Card.tsx");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        write_file_atomic(&path, "new", "rewrite imports in").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn atomic_write_fails_for_missing_directory() {
        let result = write_file_atomic(
            Path::new("/nonexistent/dir/Card.tsx"),
            "content",
            "rewrite imports in",
        );
        assert_eq!(result.unwrap_err().code.as_str(), "internal.io_error");
    }
}
