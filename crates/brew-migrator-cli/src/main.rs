use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

mod completion;
mod config;
mod console;
mod dispatch;
mod render;

use dispatch::run_cli;

#[derive(Parser, Debug)]
#[command(name = "brew-migrator", version)]
#[command(about = "Migrate applications in /Applications to Homebrew Casks", long_about = None)]
struct Cli {
    /// List all applications found in the applications directory.
    #[arg(long)]
    list_apps: bool,
    /// Process a specific application by name.
    #[arg(long, value_name = "NAME")]
    app: Option<String>,
    /// Delete the migration history file and exit.
    #[arg(long)]
    reset_history: bool,
    /// Install the top match for every application without prompting.
    #[arg(long)]
    batch: bool,
    /// Also revisit applications already migrated or skipped.
    #[arg(long)]
    retry_skipped: bool,
    /// Print the applications a run would process, then exit.
    #[arg(long)]
    dry_run: bool,
    /// Print the run report as JSON.
    #[arg(long)]
    json: bool,
    /// Disable badges, colors and spinners.
    #[arg(long)]
    plain: bool,
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, value_name = "PATH")]
    history_file: Option<PathBuf>,
    #[arg(long, value_name = "DIR")]
    applications_dir: Option<PathBuf>,
    /// Candidates shown per page.
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,
    /// Print a shell completion script and exit.
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<CliCompletionShell>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CliCompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

fn main() -> Result<()> {
    run_cli(Cli::parse())
}

#[cfg(test)]
mod tests;
