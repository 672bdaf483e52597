//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - Text, the default human-readable group listing
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dupscan::cli::OutputFormat;
//! use dupscan::duplicates::DuplicateFinder;
//! use dupscan::error::ExitCode;
//! use dupscan::output::write_report;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let exit_code = ExitCode::from_group_count(groups.len());
//! let mut stdout = std::io::stdout().lock();
//! write_report(OutputFormat::Text, &groups, &summary, exit_code, &mut stdout, false).unwrap();
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::io::Write;

use crate::cli::OutputFormat;
use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::error::ExitCode;

// Re-export main types
pub use self::csv::{CsvOutput, CsvOutputError};
pub use self::json::{JsonOutput, JsonOutputError};
pub use self::text::TextOutput;

/// Errors raised while writing a report.
#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    /// Writing text failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output failed.
    #[error(transparent)]
    Json(#[from] JsonOutputError),

    /// CSV output failed.
    #[error(transparent)]
    Csv(#[from] CsvOutputError),
}

/// Write scan results to `writer` in the requested format.
///
/// `color` only affects text output.
///
/// # Errors
///
/// Returns [`OutputError`] if serialization or writing fails.
pub fn write_report<W: Write>(
    format: OutputFormat,
    groups: &[DuplicateGroup],
    summary: &ScanSummary,
    exit_code: ExitCode,
    writer: &mut W,
    color: bool,
) -> Result<(), OutputError> {
    match format {
        OutputFormat::Text => TextOutput::new(groups).with_color(color).write_to(writer)?,
        OutputFormat::Json => JsonOutput::new(groups, summary, exit_code).write_to(writer, true)?,
        OutputFormat::Csv => CsvOutput::new(groups).write_to(writer)?,
    }
    Ok(())
}
