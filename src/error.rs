//! Error handling for pcmfx
//!
//! Every error is fatal: the CLI reports it and exits with status 1.

use thiserror::Error;

/// Result type alias for pcmfx operations
pub type Result<T> = std::result::Result<T, PcmError>;

/// Main error type for pcmfx operations
#[derive(Error, Debug)]
pub enum PcmError {
    // Argument Errors
    #[error("{message}")]
    Usage { message: String },

    #[error("Expected positive integer for arg {name}, got {value}")]
    InvalidParameter { name: &'static str, value: u64 },

    // Resource Errors
    #[error("Memory allocation error: cannot reserve {samples} samples")]
    AllocationFailure { samples: usize },

    // File Errors
    #[error("Unable to open file {path}: {source}")]
    FileOpenFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("The file {stream} does not contain an appropriate header")]
    ShortHeader { stream: String },

    #[error("Error reading from file {stream}: {source}")]
    ReadFailure {
        stream: String,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Error reading from file {stream}: lagged read returned {actual} of {expected} samples"
    )]
    LagReadShortfall {
        stream: String,
        expected: usize,
        actual: usize,
    },

    #[error("Error writing to file {stream}: {source}")]
    WriteFailure {
        stream: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PcmError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            PcmError::Usage { .. } => "USAGE",
            PcmError::InvalidParameter { .. } => "INVALID_PARAMETER",
            PcmError::AllocationFailure { .. } => "ALLOCATION_FAILURE",
            PcmError::FileOpenFailure { .. } => "FILE_OPEN_FAILURE",
            PcmError::ShortHeader { .. } => "SHORT_HEADER",
            PcmError::ReadFailure { .. } => "READ_FAILURE",
            PcmError::LagReadShortfall { .. } => "LAG_READ_SHORTFALL",
            PcmError::WriteFailure { .. } => "WRITE_FAILURE",
            PcmError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Whether the error came from bad input on the command line rather than
    /// from the files being processed
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            PcmError::Usage { .. } | PcmError::InvalidParameter { .. }
        )
    }
}
