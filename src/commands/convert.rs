use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use recase::exclude::ConfigSource;
use recase::project::{self, DirectoryStats};
use recase::refactor::{
    self, CancelToken, ConversionRequest, Counts, DirectoryOutcome, EntityOutcome, ImportScope,
};
use recase::Direction;

use crate::commands::{load_context, CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ConvertArgs {
    /// Target directories, relative to the project root
    #[arg(conflicts_with = "all")]
    targets: Vec<PathBuf>,

    /// pascal-to-kebab or kebab-to-pascal
    #[arg(short, long)]
    direction: String,

    /// Apply changes to disk (default is dry-run)
    #[arg(long)]
    write: bool,

    /// Convert every discovered target directory
    #[arg(long)]
    all: bool,

    /// Search the whole project for imports to rewrite, not just the
    /// parent of each target
    #[arg(long)]
    imports_from_root: bool,

    /// Include every entity and its skip reason in the report
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
pub struct ConvertOutput {
    pub command: &'static str,
    pub project_root: PathBuf,
    pub config: ConfigSource,
    pub direction: Direction,
    pub dry_run: bool,
    pub import_scope: ImportScope,
    pub totals: Counts,
    pub import_updates: Vec<PathBuf>,
    pub directories: Vec<DirectorySummary>,
    pub cancelled: bool,
}

#[derive(Serialize)]
pub struct DirectorySummary {
    pub directory: PathBuf,
    /// Naming statistics before conversion, reported for dry runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<DirectoryStats>,
    pub counts: Counts,
    pub import_updates: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub import_errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<EntityOutcome>>,
}

pub fn run(args: ConvertArgs, global: &GlobalArgs) -> CmdResult<ConvertOutput> {
    let direction = Direction::from_str(&args.direction)?;
    let ctx = load_context(global)?;

    let targets = if args.all {
        project::discover_target_directories(&ctx.root, &ctx.exclusions)?
    } else {
        args.targets
    };
    if targets.is_empty() {
        let err = if args.all {
            recase::Error::target_not_found(ctx.root.display().to_string())
        } else {
            recase::Error::validation_missing_argument(vec!["targets".to_string()])
                .with_hint("Pass target directories or use --all")
        };
        return Err(err);
    }

    let mut request = ConversionRequest::new(&ctx.root, targets, direction, ctx.exclusions);
    request.dry_run = !args.write;
    if args.imports_from_root {
        request.import_scope = ImportScope::ProjectRoot;
    }

    let previews: Vec<Option<DirectoryStats>> = if request.dry_run {
        request
            .targets
            .iter()
            .map(|t| project::analyze_directory(&ctx.root.join(t), &request.exclusions).ok())
            .collect()
    } else {
        Vec::new()
    };

    recase::log_status!(
        "convert",
        "{} {} target(s) ({})",
        if request.dry_run { "Previewing" } else { "Converting" },
        request.targets.len(),
        direction.as_str()
    );

    let outcome = refactor::run_conversion(&request, &CancelToken::new())?;
    let exit_code = if outcome.has_errors() || outcome.cancelled { 1 } else { 0 };

    let directories = outcome
        .directories
        .into_iter()
        .enumerate()
        .map(|(i, dir)| summarize(dir, previews.get(i).cloned().flatten(), args.verbose))
        .collect();

    Ok((
        ConvertOutput {
            command: "convert",
            project_root: ctx.root,
            config: ctx.config_source,
            direction,
            dry_run: outcome.dry_run,
            import_scope: request.import_scope,
            totals: outcome.totals,
            import_updates: outcome.import_updates,
            directories,
            cancelled: outcome.cancelled,
        },
        exit_code,
    ))
}

fn summarize(
    dir: DirectoryOutcome,
    preview: Option<DirectoryStats>,
    verbose: bool,
) -> DirectorySummary {
    DirectorySummary {
        directory: dir.directory,
        preview,
        counts: dir.counts,
        import_updates: dir.import_updates,
        import_errors: dir.import_errors,
        scan_error: dir.scan_error,
        items: verbose.then_some(dir.items),
    }
}
