//! Error types for the request generator.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using GeneratorError.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

#[derive(Debug, Error)]
pub enum GeneratorError {
    // === Configuration errors (reported with usage) ===
    #[error("Unable to process: {0}")]
    InvalidArgument(String),

    #[error("{0} is required.")]
    MissingRequired(&'static str),

    #[error("Invalid value for {flag}: {message}")]
    InvalidValue { flag: &'static str, message: String },

    #[error("Unable to read scenario file {}: {}", .path.display(), .message)]
    Scenario { path: PathBuf, message: String },

    #[error("{flag}: a geometry backend is required to use this option (build with the `geometry` feature)")]
    GeometryUnavailable { flag: &'static str },

    #[error("Unable to open dataset \"{}\": {}", .path.display(), .message)]
    Dataset { path: PathBuf, message: String },

    #[error("{0}")]
    Projection(String),

    // === Run-time errors ===
    #[error(
        "Acceptance rate too low: {attempts} consecutive candidates rejected \
         after {accepted} of {requested} samples were accepted"
    )]
    AcceptanceRateTooLow {
        attempts: u64,
        accepted: u64,
        requested: u64,
    },

    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GeneratorError {
    /// Whether the usage text should accompany this error.
    pub fn is_usage_error(&self) -> bool {
        !matches!(
            self,
            GeneratorError::AcceptanceRateTooLow { .. } | GeneratorError::Io { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: path.into(),
            source,
        }
    }
}
