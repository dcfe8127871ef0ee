use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use recase::exclude::ConfigSource;
use recase::project::{self, DirectoryStats};

use crate::commands::{load_context, CmdResult, GlobalArgs};

#[derive(Args)]
pub struct ScanArgs {}

#[derive(Serialize)]
pub struct ScanOutput {
    pub command: &'static str,
    pub project_root: PathBuf,
    pub config: ConfigSource,
    pub directories: Vec<DirectoryReport>,
    pub totals: DirectoryStats,
}

#[derive(Serialize)]
pub struct DirectoryReport {
    pub directory: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<DirectoryStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub fn run(_args: ScanArgs, global: &GlobalArgs) -> CmdResult<ScanOutput> {
    let ctx = load_context(global)?;
    let dirs = project::discover_target_directories(&ctx.root, &ctx.exclusions)?;

    recase::log_status!("scan", "{} target directories under {}", dirs.len(), ctx.root.display());

    let mut totals = DirectoryStats::default();
    let directories = dirs
        .into_iter()
        .map(|dir| match project::analyze_directory(&ctx.root.join(&dir), &ctx.exclusions) {
            Ok(stats) => {
                totals.add(&stats);
                DirectoryReport {
                    directory: dir,
                    stats: Some(stats),
                    error: None,
                }
            }
            Err(err) => DirectoryReport {
                directory: dir,
                stats: None,
                error: Some(err.to_string()),
            },
        })
        .collect();

    Ok((
        ScanOutput {
            command: "scan",
            project_root: ctx.root,
            config: ctx.config_source,
            directories,
            totals,
        },
        0,
    ))
}
