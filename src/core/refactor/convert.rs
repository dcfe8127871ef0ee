//! Conversion orchestrator: scan, plan, rename, then rewrite imports, one
//! target directory at a time.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

use super::entity::{ClaimedDestinations, ConversionEntity, EntityKind, Planned, Planner};
use super::imports;
use super::rename::{rename_entity, sort_deepest_first};
use crate::case::{AcronymSet, Direction};
use crate::error::{Error, Result};
use crate::exclude::ExcludeConfig;
use crate::scan;

// ============================================================================
// Types
// ============================================================================

/// Shared cancellation flag, checked between entities and between directories.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Which files are searched for imports of renamed entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportScope {
    /// The parent of each target directory.
    #[default]
    TargetParent,
    /// The whole project.
    ProjectRoot,
}

/// One conversion run. Immutable while the run is in progress.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub project_root: PathBuf,
    /// Absolute, or relative to `project_root`.
    pub targets: Vec<PathBuf>,
    pub direction: Direction,
    pub dry_run: bool,
    pub exclusions: ExcludeConfig,
    pub acronyms: AcronymSet,
    pub import_scope: ImportScope,
}

impl ConversionRequest {
    /// Request with the built-in acronyms plus any listed in `exclusions`.
    pub fn new(
        project_root: impl Into<PathBuf>,
        targets: Vec<PathBuf>,
        direction: Direction,
        exclusions: ExcludeConfig,
    ) -> Self {
        let acronyms = AcronymSet::with_extra(&exclusions.acronyms);
        Self {
            project_root: project_root.into(),
            targets,
            direction,
            dry_run: true,
            exclusions,
            acronyms,
            import_scope: ImportScope::default(),
        }
    }

    fn resolve(&self, target: &Path) -> PathBuf {
        if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.project_root.join(target)
        }
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.project_root).unwrap_or(path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Processed,
    Skipped,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntityOutcome {
    pub kind: EntityKind,
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_path: Option<PathBuf>,
    pub status: EntityStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl Counts {
    fn record(&mut self, status: EntityStatus) {
        self.total += 1;
        match status {
            EntityStatus::Processed => self.processed += 1,
            EntityStatus::Skipped => self.skipped += 1,
            EntityStatus::Error => self.errors += 1,
        }
    }

    fn add(&mut self, other: &Counts) {
        self.total += other.total;
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.errors += other.errors;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryOutcome {
    pub directory: PathBuf,
    pub counts: Counts,
    pub items: Vec<EntityOutcome>,
    /// Files whose imports were (or in a dry run would be) rewritten.
    pub import_updates: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub import_errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_error: Option<String>,
}

impl DirectoryOutcome {
    fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            counts: Counts::default(),
            items: Vec::new(),
            import_updates: Vec::new(),
            import_errors: Vec::new(),
            scan_error: None,
        }
    }

    fn push(&mut self, item: EntityOutcome) {
        self.counts.record(item.status);
        self.items.push(item);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutcome {
    pub direction: Direction,
    pub dry_run: bool,
    pub totals: Counts,
    /// De-duplicated and sorted across all directories.
    pub import_updates: Vec<PathBuf>,
    pub directories: Vec<DirectoryOutcome>,
    pub cancelled: bool,
}

impl ConversionOutcome {
    /// True when any entity, import rewrite, or directory scan failed.
    pub fn has_errors(&self) -> bool {
        self.totals.errors > 0
            || self
                .directories
                .iter()
                .any(|d| !d.import_errors.is_empty() || d.scan_error.is_some())
    }
}

// ============================================================================
// Orchestration
// ============================================================================

/// Convert every target directory in order, summing the outcomes.
///
/// Fails only when there is nothing to run against: no targets, or a project
/// root that is not a directory. Everything else is recorded in the outcome.
pub fn run_conversion(request: &ConversionRequest, cancel: &CancelToken) -> Result<ConversionOutcome> {
    if request.targets.is_empty() {
        return Err(Error::validation_missing_argument(vec!["targets".to_string()])
            .with_hint("Pass target directories or use --all"));
    }
    if !request.project_root.is_dir() {
        return Err(Error::project_root_not_found(
            request.project_root.display().to_string(),
        ));
    }

    let mut outcome = ConversionOutcome {
        direction: request.direction,
        dry_run: request.dry_run,
        totals: Counts::default(),
        import_updates: Vec::new(),
        directories: Vec::new(),
        cancelled: false,
    };
    let mut updated: BTreeSet<PathBuf> = BTreeSet::new();

    for target in &request.targets {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            break;
        }
        let dir_outcome = convert_directory(request, target, cancel);
        outcome.totals.add(&dir_outcome.counts);
        updated.extend(dir_outcome.import_updates.iter().cloned());
        outcome.directories.push(dir_outcome);
    }

    if cancel.is_cancelled() {
        outcome.cancelled = true;
    }
    outcome.import_updates = updated.into_iter().collect();
    Ok(outcome)
}

/// Convert one target directory. Failures are recorded, never returned.
pub fn convert_directory(
    request: &ConversionRequest,
    target: &Path,
    cancel: &CancelToken,
) -> DirectoryOutcome {
    let dir = request.resolve(target);
    let mut outcome = DirectoryOutcome::new(request.relative(&dir).to_path_buf());

    let scanned = match scan::scan(&dir, &request.exclusions) {
        Ok(scanned) => scanned,
        Err(err) => {
            crate::log_status!("convert", "Skipping {}: {}", dir.display(), err);
            outcome.scan_error = Some(err.to_string());
            return outcome;
        }
    };
    for warning in &scanned.warnings {
        crate::log_status!("convert", "Warning: {}", warning);
    }

    let planner = Planner {
        direction: request.direction,
        acronyms: &request.acronyms,
        exclusions: &request.exclusions,
    };
    let mut claimed = ClaimedDestinations::new();
    let mut renamed: Vec<(String, String)> = Vec::new();

    // Files first: their paths are still valid while parent directories keep
    // their old names.
    for file in &scanned.files {
        if cancel.is_cancelled() {
            break;
        }
        let planned = claimed.claim(planner.plan_file(file));
        apply(request, EntityKind::File, file, planned, &mut outcome, &mut renamed);
    }

    if !cancel.is_cancelled() {
        let mut dirs: Vec<ConversionEntity> = Vec::new();
        for component in &scanned.dir_components {
            match claimed.claim(planner.plan_directory(component)) {
                Ok(entity) => dirs.push(entity),
                Err(reason) => {
                    outcome.push(skipped(request, EntityKind::Directory, component, reason))
                }
            }
        }
        sort_deepest_first(&mut dirs);
        for entity in dirs {
            if cancel.is_cancelled() {
                break;
            }
            let path = entity.old_path.clone();
            apply(request, EntityKind::Directory, &path, Ok(entity), &mut outcome, &mut renamed);
        }
    }

    if !renamed.is_empty() {
        rewrite_imports(request, &dir, &renamed, &mut outcome);
    }

    outcome
}

fn apply(
    request: &ConversionRequest,
    kind: EntityKind,
    path: &Path,
    planned: Planned,
    outcome: &mut DirectoryOutcome,
    renamed: &mut Vec<(String, String)>,
) {
    let entity = match planned {
        Ok(entity) => entity,
        Err(reason) => {
            outcome.push(skipped(request, kind, path, reason));
            return;
        }
    };

    match rename_entity(&entity, request.dry_run) {
        Ok(new_path) => {
            crate::log_status!(
                "convert",
                "{} -> {}",
                request.relative(&entity.old_path).display(),
                request.relative(&new_path).display()
            );
            outcome.push(EntityOutcome {
                kind,
                path: request.relative(&entity.old_path).to_path_buf(),
                new_path: Some(request.relative(&new_path).to_path_buf()),
                status: EntityStatus::Processed,
                reason: None,
            });
            renamed.push((entity.old_name, entity.new_name));
        }
        Err(err) => {
            crate::log_status!("convert", "Error: {}", err);
            outcome.push(EntityOutcome {
                kind,
                path: request.relative(&entity.old_path).to_path_buf(),
                new_path: Some(request.relative(&entity.new_path).to_path_buf()),
                status: EntityStatus::Error,
                reason: Some(err.to_string()),
            });
        }
    }
}

fn skipped(
    request: &ConversionRequest,
    kind: EntityKind,
    path: &Path,
    reason: impl ToString,
) -> EntityOutcome {
    EntityOutcome {
        kind,
        path: request.relative(path).to_path_buf(),
        new_path: None,
        status: EntityStatus::Skipped,
        reason: Some(reason.to_string()),
    }
}

fn import_scope_root(request: &ConversionRequest, dir: &Path) -> PathBuf {
    match request.import_scope {
        ImportScope::ProjectRoot => request.project_root.clone(),
        ImportScope::TargetParent => dir.parent().unwrap_or(dir).to_path_buf(),
    }
}

fn rewrite_imports(
    request: &ConversionRequest,
    dir: &Path,
    renamed: &[(String, String)],
    outcome: &mut DirectoryOutcome,
) {
    let scope = import_scope_root(request, dir);
    let candidates = match scan::source_files(&scope, &request.exclusions) {
        Ok(files) => files,
        Err(err) => {
            outcome.import_errors.push(err.to_string());
            return;
        }
    };

    for file in candidates {
        match imports::rewrite_file(&file, renamed, request.dry_run) {
            Ok(true) => outcome
                .import_updates
                .push(request.relative(&file).to_path_buf()),
            Ok(false) => {}
            Err(err) => {
                crate::log_status!("convert", "Error: {}", err);
                outcome.import_errors.push(err.to_string());
            }
        }
    }

    if !outcome.import_updates.is_empty() {
        crate::log_status!(
            "convert",
            "Updated imports in {} file(s)",
            outcome.import_updates.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn request(root: &Path, targets: &[&str], direction: Direction) -> ConversionRequest {
        ConversionRequest::new(
            root,
            targets.iter().map(PathBuf::from).collect(),
            direction,
            ExcludeConfig::default(),
        )
    }

    #[test]
    fn no_targets_is_fatal() {
        let dir = TempDir::new().unwrap();
        let req = request(dir.path(), &[], Direction::PascalToKebab);
        let err = run_conversion(&req, &CancelToken::new()).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.missing_argument");
    }

    #[test]
    fn missing_target_is_recorded_and_others_continue() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "ui/Button.tsx", "");

        let mut req = request(dir.path(), &["missing", "ui"], Direction::PascalToKebab);
        req.dry_run = false;
        let outcome = run_conversion(&req, &CancelToken::new()).unwrap();

        assert_eq!(outcome.directories.len(), 2);
        assert!(outcome.directories[0].scan_error.is_some());
        assert_eq!(outcome.directories[0].counts, Counts::default());
        assert_eq!(outcome.totals.processed, 1);
        assert!(dir.path().join("ui/button.tsx").is_file());
        assert!(outcome.has_errors());
    }

    #[test]
    fn files_and_nested_components_rename_in_safe_order() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "ui/Outer/index.tsx", "import { Inner } from './Inner';\n");
        write(root, "ui/Outer/Inner/index.tsx", "");
        write(root, "ui/Outer/Inner/HelperText.tsx", "");

        let mut req = request(root, &["ui"], Direction::PascalToKebab);
        req.dry_run = false;
        let outcome = run_conversion(&req, &CancelToken::new()).unwrap();

        assert_eq!(outcome.totals.processed, 3);
        assert_eq!(outcome.totals.errors, 0);
        assert!(root.join("ui/outer/inner/helper-text.tsx").is_file());
        assert_eq!(
            fs::read_to_string(root.join("ui/outer/index.tsx")).unwrap(),
            "import { Inner } from './inner';\n"
        );
        assert_eq!(outcome.import_updates, vec![PathBuf::from("ui/outer/index.tsx")]);
    }

    #[test]
    fn skip_reasons_are_reported() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "ui/Card.test.tsx", "");
        write(root, "ui/already-kebab.tsx", "");
        write(root, "ui/UserCard.tsx", "");
        write(root, "ui/user-card.tsx", "");

        let req = request(root, &["ui"], Direction::PascalToKebab);
        let outcome = run_conversion(&req, &CancelToken::new()).unwrap();

        assert_eq!(outcome.totals.total, 4);
        assert_eq!(outcome.totals.skipped, 4);
        let reasons: Vec<_> = outcome.directories[0]
            .items
            .iter()
            .map(|i| i.reason.clone().unwrap())
            .collect();
        assert!(reasons.iter().any(|r| r.contains(".test.")));
        assert!(reasons.iter().any(|r| r.contains("already exists")));
    }

    #[test]
    fn cancelled_run_processes_nothing_further() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "ui/Button.tsx", "");
        write(dir.path(), "forms/Field.tsx", "");

        let cancel = CancelToken::new();
        cancel.cancel();
        let mut req = request(dir.path(), &["ui", "forms"], Direction::PascalToKebab);
        req.dry_run = false;
        let outcome = run_conversion(&req, &cancel).unwrap();

        assert!(outcome.cancelled);
        assert!(outcome.directories.is_empty());
        assert!(dir.path().join("ui/Button.tsx").is_file());
    }

    #[test]
    fn cancelled_directory_does_not_plan_components() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "ui/Button.tsx", "");
        write(dir.path(), "ui/IconButton/index.tsx", "");
        write(dir.path(), "ui/already-kebab/index.tsx", "");

        let cancel = CancelToken::new();
        cancel.cancel();
        let req = request(dir.path(), &["ui"], Direction::PascalToKebab);
        let outcome = convert_directory(&req, Path::new("ui"), &cancel);

        assert_eq!(outcome.counts, Counts::default());
        assert!(outcome.items.is_empty());
    }

    #[test]
    fn import_scope_widens_to_project_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "apps/web/components/Button.tsx", "");
        write(
            root,
            "packages/pages/Home.tsx",
            "import { Button } from '../../apps/web/components/Button';\n",
        );

        let mut req = request(root, &["apps/web/components"], Direction::PascalToKebab);
        let outcome = run_conversion(&req, &CancelToken::new()).unwrap();
        assert!(outcome.import_updates.is_empty());

        req.import_scope = ImportScope::ProjectRoot;
        let outcome = run_conversion(&req, &CancelToken::new()).unwrap();
        assert_eq!(
            outcome.import_updates,
            vec![PathBuf::from("packages/pages/Home.tsx")]
        );
    }
}
