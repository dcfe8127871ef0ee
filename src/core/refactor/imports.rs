//! Textual import rewriting.
//!
//! Works on `import ... from '<path>'` and `export ... from '<path>'`
//! statements matched by a pattern, not a parser. Only relative paths
//! (`./`, `../`) are considered, and only their final segment is compared and
//! replaced. Package specifiers, subpaths and aliases are never touched.

use std::borrow::Cow;
use std::path::Path;
use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::error::Result;
use crate::utils::io;

/// Directory name whose files are never excluded by import patterns.
const PRIVATE_COMPONENTS_DIR: &str = "_components";

fn statement_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^(\s*(?:import|export)\b[^;'"]*?\bfrom\s*)(['"])([^'"\n]+)(['"])"#)
            .expect("Invalid regex pattern")
    })
}

/// Import paths of every `import`/`export ... from` statement in `content`.
pub fn import_paths(content: &str) -> Vec<&str> {
    statement_re()
        .captures_iter(content)
        .filter(|caps| caps[2] == caps[4])
        .filter_map(|caps| caps.get(3).map(|m| m.as_str()))
        .collect()
}

/// First import path in `file` containing any of `patterns`.
///
/// Files under a `_components` directory are exempt. A file that cannot be
/// read is reported and treated as not excluded.
pub fn find_excluded_import(file: &Path, patterns: &[String]) -> Option<String> {
    if patterns.is_empty() {
        return None;
    }
    let exempt = file
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .any(|c| c.as_os_str() == PRIVATE_COMPONENTS_DIR);
    if exempt {
        return None;
    }

    let content = match io::read_file(file, "read imports of") {
        Ok(content) => content,
        Err(err) => {
            crate::log_status!("convert", "Warning: {}", err);
            return None;
        }
    };

    import_paths(&content)
        .into_iter()
        .find(|path| {
            patterns
                .iter()
                .any(|p| !p.is_empty() && path.contains(p.as_str()))
        })
        .map(str::to_string)
}

/// Rewrite import paths whose final segment matches an `old` name.
///
/// Returns `None` when nothing changed. The relative prefix and quote
/// character are preserved, no extension is added.
pub fn rewrite_content<'a>(content: &'a str, renames: &[(String, String)]) -> Option<String> {
    let mut changed = false;

    let rewritten: Cow<'a, str> = statement_re().replace_all(content, |caps: &Captures| {
        match rewrite_path(caps, renames) {
            Some(path) => {
                changed = true;
                format!("{}{}{}{}", &caps[1], &caps[2], path, &caps[4])
            }
            None => caps[0].to_string(),
        }
    });

    if changed {
        Some(rewritten.into_owned())
    } else {
        None
    }
}

fn rewrite_path(caps: &Captures, renames: &[(String, String)]) -> Option<String> {
    if caps[2] != caps[4] || !is_relative(&caps[3]) {
        return None;
    }
    let (prefix, last) = caps[3].rsplit_once('/')?;
    renames
        .iter()
        .find(|(old, _)| old == last)
        .map(|(_, new)| format!("{}/{}", prefix, new))
}

fn is_relative(path: &str) -> bool {
    path.starts_with("./") || path.starts_with("../")
}

/// Rewrite one file for a single rename. See [`rewrite_file`].
pub fn rewrite_imports(file: &Path, old: &str, new: &str, dry_run: bool) -> Result<bool> {
    rewrite_file(file, &[(old.to_string(), new.to_string())], dry_run)
}

/// Apply every rename to `file` in one pass; `true` when its imports changed.
///
/// In dry-run mode nothing is written.
pub fn rewrite_file(file: &Path, renames: &[(String, String)], dry_run: bool) -> Result<bool> {
    if renames.is_empty() {
        return Ok(false);
    }
    let content = io::read_file(file, "read imports of")?;
    let Some(updated) = rewrite_content(&content, renames) else {
        return Ok(false);
    };
    if !dry_run {
        io::write_file_atomic(file, &updated, "rewrite imports in")?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn pair(old: &str, new: &str) -> Vec<(String, String)> {
        vec![(old.to_string(), new.to_string())]
    }

    #[test]
    fn rewrites_final_segment_and_keeps_prefix_and_quotes() {
        let src = "import { Button } from '../common/Button';\n\
                   import Icon from \"./Icon\";\n";
        let out = rewrite_content(src, &pair("Button", "button")).unwrap();
        assert_eq!(
            out,
            "import { Button } from '../common/button';\nimport Icon from \"./Icon\";\n"
        );
    }

    #[test]
    fn does_not_touch_prefix_matches_or_inner_segments() {
        let src = "import { A } from './ButtonGroup';\n\
                   import { B } from './Button/styles';\n";
        assert_eq!(rewrite_content(src, &pair("Button", "button")), None);
    }

    #[test]
    fn leaves_bare_specifiers_alone() {
        let src = "import Button from 'Button';\nimport React from 'react';\n";
        assert_eq!(rewrite_content(src, &pair("Button", "button")), None);
    }

    #[test]
    fn handles_multiline_and_reexports() {
        let src = "import {\n  Card,\n  CardBody,\n} from '../ui/Card';\n\
                   export { default } from './Card';\n\
                   export * from \"@/features/Card\";\n";
        let out = rewrite_content(src, &pair("Card", "card")).unwrap();
        assert!(out.contains("} from '../ui/card';"));
        assert!(out.contains("export { default } from './card';"));
        assert!(out.contains("export * from \"@/features/Card\";"));
    }

    #[test]
    fn package_subpaths_are_not_rewritten() {
        let src = "import Link from 'next/link';\n\
                   import { createRoot } from 'react-dom/client';\n\
                   import { x } from './link';\n";
        let renames = vec![
            ("link".to_string(), "Link".to_string()),
            ("client".to_string(), "Client".to_string()),
        ];
        let out = rewrite_content(src, &renames).unwrap();
        assert_eq!(
            out,
            "import Link from 'next/link';\n\
             import { createRoot } from 'react-dom/client';\n\
             import { x } from './Link';\n"
        );
    }

    #[test]
    fn mismatched_quotes_are_skipped() {
        let src = "import X from './Button\";\n";
        assert_eq!(rewrite_content(src, &pair("Button", "button")), None);
    }

    #[test]
    fn applies_several_renames_in_one_pass() {
        let src = "import A from './UserCard';\nimport B from '../IconButton';\n";
        let renames = vec![
            ("UserCard".to_string(), "user-card".to_string()),
            ("IconButton".to_string(), "icon-button".to_string()),
        ];
        let out = rewrite_content(src, &renames).unwrap();
        assert_eq!(
            out,
            "import A from './user-card';\nimport B from '../icon-button';\n"
        );
    }

    #[test]
    fn rewrite_imports_respects_dry_run() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Card.tsx");
        let original = "import { Button } from './Button';\n";
        fs::write(&file, original).unwrap();

        assert!(rewrite_imports(&file, "Button", "button", true).unwrap());
        assert_eq!(fs::read_to_string(&file).unwrap(), original);

        assert!(rewrite_imports(&file, "Button", "button", false).unwrap());
        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "import { Button } from './button';\n"
        );
        assert!(!rewrite_imports(&file, "Button", "button", false).unwrap());
    }

    #[test]
    fn finds_excluded_import() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Form.tsx");
        fs::write(
            &file,
            "import React from 'react';\nimport { Old } from '@/legacy/Old';\n",
        )
        .unwrap();

        let patterns = vec!["@/legacy".to_string()];
        assert_eq!(
            find_excluded_import(&file, &patterns),
            Some("@/legacy/Old".to_string())
        );
        assert_eq!(find_excluded_import(&file, &["vue".to_string()]), None);
    }

    #[test]
    fn private_component_dirs_are_exempt_from_import_exclusion() {
        let dir = TempDir::new().unwrap();
        let private = dir.path().join("_components");
        fs::create_dir(&private).unwrap();
        let file = private.join("Form.tsx");
        fs::write(&file, "import { Old } from '@/legacy/Old';\n").unwrap();

        assert_eq!(find_excluded_import(&file, &["@/legacy".to_string()]), None);
    }

    #[test]
    fn unreadable_file_is_not_excluded() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("Missing.tsx");
        assert_eq!(find_excluded_import(&missing, &["x".to_string()]), None);
    }
}
