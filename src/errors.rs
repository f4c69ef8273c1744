//! Error types for coverage import, export and format resolution.
//!
//! Every fallible operation in the library returns [`Result`], whose error
//! side is the single [`Error`] enum below. Malformed-input variants carry the
//! 1-based line number of the offending input line so callers can point users
//! at the exact spot in a coverage file.

use crate::formats::Format;
use thiserror::Error;

/// Main error type for covconv operations
#[derive(Debug, Error)]
pub enum Error {
    /// A line index beyond the configured safety ceiling
    #[error("line index {index} exceeds the limit of {limit}")]
    LineOutOfBounds { index: usize, limit: usize },

    /// `end_of_record` seen while no record was open
    #[error("line {line}: end_of_record with no file path")]
    EndOfRecordWithoutFile { line: usize },

    /// A data directive seen while no record was open
    #[error("line {line}: DA line with no file path")]
    LineDataWithoutFile { line: usize },

    /// A data directive whose value is not `line,count`
    #[error("line {line}: error parsing DA line {value:?}: {reason}")]
    InvalidLineData {
        line: usize,
        value: String,
        reason: String,
    },

    /// Input ended while a record was still open
    #[error("unfinished record for {file:?}")]
    UnfinishedRecord { file: String },

    /// Missing or empty `mode:` header in a Go cover profile
    #[error("line {line}: bad mode line: {text:?}")]
    BadModeLine { line: usize, text: String },

    /// A Go cover profile block line that does not match the grammar
    #[error("line {line}: {text:?} doesn't match expected format")]
    InvalidBlock { line: usize, text: String },

    /// Two identical blocks that disagree on their statement count
    #[error("{file}: inconsistent NumStmt: changed from {before} to {after}")]
    InconsistentStatements {
        file: String,
        before: u64,
        after: u64,
    },

    /// Filename extension does not map to a known format
    #[error(
        "could not determine format for filename {filename:?}; supported extensions are {}",
        Format::supported_extensions().join(", ")
    )]
    UnknownExtension { filename: String },

    /// Format has no importer
    #[error("import from {0} not supported")]
    ImportNotSupported(Format),

    /// Format has no exporter
    #[error("export to {0} not supported")]
    ExportNotSupported(Format),

    /// The `Unset` sentinel reached a dispatch table
    #[error("invalid format {0}")]
    InvalidFormat(Format),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a malformed `DA` error
    pub fn invalid_line_data(
        line: usize,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidLineData {
            line,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the content of an input stream
    /// (as opposed to I/O, format selection or resource limits).
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::EndOfRecordWithoutFile { .. }
                | Self::LineDataWithoutFile { .. }
                | Self::InvalidLineData { .. }
                | Self::UnfinishedRecord { .. }
                | Self::BadModeLine { .. }
                | Self::InvalidBlock { .. }
                | Self::InconsistentStatements { .. }
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
