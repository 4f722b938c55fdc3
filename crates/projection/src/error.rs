//! Error types for projection lookups and transforms.

use thiserror::Error;

/// Result type alias using ProjectionError.
pub type ProjectionResult<T> = Result<T, ProjectionError>;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("Unable to find projection: EPSG:{0}")]
    UnknownCode(u32),

    #[error("Invalid projection definition for EPSG:{code}: {message}")]
    InvalidDefinition { code: u32, message: String },

    #[error("Transform EPSG:{source_code} -> EPSG:{target_code} failed for ({x}, {y}): {message}")]
    TransformFailed {
        source_code: u32,
        target_code: u32,
        x: f64,
        y: f64,
        message: String,
    },
}
