//! dupscan - content-hash duplicate file finder
//!
//! Walks a directory tree, digests every regular file with SHA-256 (or
//! BLAKE3) and reports groups of files with identical content.
//!
//! The library is split along the scan pipeline:
//!
//! - [`scanner`]: directory walking and content hashing
//! - [`duplicates`]: grouping digests and orchestrating a scan
//! - [`output`]: text, JSON and CSV reports
//! - [`config`], [`cli`], [`logging`], [`progress`], [`error`]: the
//!   application shell around the pipeline

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Context;

use crate::cli::{Cli, Commands, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::progress::Progress;

/// Run the application for parsed command-line arguments.
///
/// Returns the exit code of a completed run.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the scan root is
/// invalid, or the report cannot be written. Map it with
/// [`ExitCode::from_error`].
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    let mut config =
        Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Scan(ref args) => {
            config.apply_scan_args(args);
            run_scan(&cli, args, &config)
        }
    }
}

fn run_scan(cli: &Cli, args: &ScanArgs, config: &Config) -> anyhow::Result<ExitCode> {
    log::debug!(
        "Effective configuration (log level {}): {:?}",
        logging::current_level_name(),
        config
    );

    let progress = Arc::new(Progress::new(cli.quiet, cli.verbose > 0));
    let finder = DuplicateFinder::new(config.finder_config().with_progress_callback(progress));

    let (groups, summary) = finder.find_duplicates(&args.path)?;
    let exit_code = ExitCode::from_group_count(groups.len());

    let stdout = std::io::stdout();
    let color = !cli.no_color && stdout.is_terminal();
    let mut handle = stdout.lock();
    output::write_report(
        config.output,
        &groups,
        &summary,
        exit_code,
        &mut handle,
        color,
    )
    .context("Failed to write report")?;

    if config.output == OutputFormat::Text {
        log::info!(
            "{} groups, {} duplicate files, {} reclaimable ({:.1}% of {})",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_display(),
            summary.wasted_percentage(),
            summary.total_size_display()
        );
    }
    if summary.skipped() > 0 && cli.verbose == 0 {
        log::debug!(
            "{} entries skipped; rerun with --verbose to list them",
            summary.skipped()
        );
    }

    Ok(exit_code)
}
