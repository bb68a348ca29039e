//! Error types for the settlement engine.
//!
//! The engine itself is infallible; these cover the CSV edge and the CLI.

use crate::validate::{FailureCause, Mismatch};
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while loading balances or emitting a settlement.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Participant listed more than once in the same round
    #[error("Duplicate participant {participant} at row {row}")]
    DuplicateParticipant { participant: String, row: usize },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: settlement-engine <balances.csv> [--stats]")]
    MissingArgument,

    /// Unrecognised command-line option
    #[error("Unknown option {0}. Usage: settlement-engine <balances.csv> [--stats]")]
    UnknownOption(String),

    /// Computed transfers failed validation and must not be applied
    #[error("Settlement rejected ({}): {}", .cause, format_mismatches(.mismatches))]
    ValidationFailed {
        cause: FailureCause,
        mismatches: Vec<Mismatch>,
    },
}

fn format_mismatches(mismatches: &[Mismatch]) -> String {
    if mismatches.is_empty() {
        return "no participant mismatches".to_string();
    }
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
