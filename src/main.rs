use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::GlobalArgs;

mod commands;
mod output;
mod tty;

use commands::{convert, name, scan};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "recase")]
#[command(version = VERSION)]
#[command(about = "Rename components between PascalCase and kebab-case and fix their imports")]
struct Cli {
    /// Project root (default: detected from the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    root: Option<PathBuf>,

    /// Exclusion config file (default: recase.yaml at the project root)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rename files and directory components, then rewrite imports
    Convert(convert::ConvertArgs),
    /// List convertible directories with naming statistics
    Scan(scan::ScanArgs),
    /// Classify names and show their conversions
    Name(name::NameArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let global = GlobalArgs {
        root: cli.root,
        config: cli.config,
    };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);
    let _ = output::print_json_result(json_result);

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
