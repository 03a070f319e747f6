//! Command-line interface for repo-extract
//!
//! Clones a repository, asks about every file and folder, and appends the
//! chosen files to a single annotated text file.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::fetch::GitSource;
use crate::prompt::LinePrompter;
use crate::session::Session;
use crate::traverse::FsListing;

/// Interactively pick repository files into one annotated text dump
#[derive(Parser)]
#[command(name = "repo-extract")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Repository to clone (URL or local path)
    #[arg(value_name = "REPO")]
    repo: String,

    /// File to append the selected contents to
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Directory to clone into (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    workdir: Option<PathBuf>,

    /// Offer the .git metadata directory for selection
    #[arg(long)]
    include_git_dir: bool,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence over the flags.
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();

    let overrides = CliOverrides {
        repo_url: Some(cli.repo),
        output: cli.output,
        workdir: cli.workdir,
        include_git_dir: if cli.include_git_dir { Some(true) } else { None },
    };
    let config = merge_cli_with_config(load_config()?, overrides);

    let cwd = std::env::current_dir()?;
    let mut session = Session::new(config, cwd, GitSource, FsListing, LinePrompter::stdio());
    if let Ok(exe) = std::env::current_exe() {
        session = session.exclude(exe);
    }

    let report = session.run()?;
    println!(
        "{} Finished. Check '{}'",
        style("✔").green(),
        style(report.output.display()).bold()
    );
    Ok(())
}
