use std::path::PathBuf;

use recase::exclude::{self, ConfigSource, ExcludeConfig};
use recase::project;

pub type CmdResult<T> = recase::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub root: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

/// Project root and exclusions shared by commands that touch a tree.
pub(crate) struct ProjectContext {
    pub root: PathBuf,
    pub exclusions: ExcludeConfig,
    pub config_source: ConfigSource,
}

/// Resolve `--root` (or detect it from the working directory) and load the
/// exclusion config once for the run.
pub(crate) fn load_context(global: &GlobalArgs) -> recase::Result<ProjectContext> {
    let root = match &global.root {
        Some(root) if root.is_dir() => root.clone(),
        Some(root) => {
            return Err(recase::Error::project_root_not_found(
                root.display().to_string(),
            ))
        }
        None => {
            let cwd = std::env::current_dir().map_err(|e| {
                recase::Error::internal_io(e.to_string(), Some("read current dir".to_string()))
            })?;
            project::find_project_root(&cwd)?
        }
    };

    let (exclusions, config_source) = exclude::resolve(&root, global.config.as_deref())?;

    Ok(ProjectContext {
        root,
        exclusions,
        config_source,
    })
}

pub mod convert;
pub mod name;
pub mod scan;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args))
    };
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (recase::Result<serde_json::Value>, i32) {
    crate::tty::status("recase is working...");

    match command {
        // Commands without project context
        crate::Commands::Name(args) => dispatch!(args, name),

        // Commands with project context
        crate::Commands::Convert(args) => dispatch!(args, global, convert),
        crate::Commands::Scan(args) => dispatch!(args, global, scan),
    }
}
