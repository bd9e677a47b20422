//! Error type shared by the parameter loaders and the projection engine

use thiserror::Error;

/// Errors raised while loading parameters or running a projection
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// The caller broke the parameter contract (empty product list, duplicate stream
    /// name, non-finite number, negative horizon or count)
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A parameter or product file could not be read
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parameter file was malformed
    #[error("malformed JSON parameters: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV product file was malformed, or a table could not be written as CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ProjectionError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ProjectionError::InvalidParameters(reason.into())
    }

    /// Whether this is a parameter contract violation rather than an input failure
    pub fn is_invalid_parameters(&self) -> bool {
        matches!(self, ProjectionError::InvalidParameters(_))
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
