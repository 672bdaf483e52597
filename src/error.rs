//! Structured error handling and exit codes.

use serde::Serialize;

use crate::duplicates::FinderError;

/// Exit codes for dupscan.
///
/// - 0: Success (completed normally, duplicates found)
/// - 1: No duplicates found (completed normally, no duplicates)
/// - 2: Invalid root (path missing, not a directory, or unresolvable)
/// - 3: General error (configuration, output failures)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed and duplicates were found.
    Success = 0,
    /// No duplicates: Scan completed but no duplicates were found.
    NoDuplicates = 1,
    /// Invalid root: The scan root does not exist or is not a directory.
    InvalidRoot = 2,
    /// General error: An unexpected error occurred.
    GeneralError = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::NoDuplicates => "DS001",
            Self::InvalidRoot => "DS002",
            Self::GeneralError => "DS003",
        }
    }

    /// Exit code for a completed scan that produced `groups` duplicate groups.
    #[must_use]
    pub fn from_group_count(groups: usize) -> Self {
        if groups > 0 {
            Self::Success
        } else {
            Self::NoDuplicates
        }
    }

    /// Exit code for a failed run.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<FinderError>().is_some() {
            Self::InvalidRoot
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS002")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
