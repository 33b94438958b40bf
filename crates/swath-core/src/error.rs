//! Error types for swath geolocation resolution.

use thiserror::Error;

/// Result type for swath resolution operations.
pub type SwathResult<T> = std::result::Result<T, SwathError>;

/// Errors that can occur while resolving swath geolocation fields.
#[derive(Error, Debug)]
pub enum SwathError {
    /// Contradictory or malformed dimension-map configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The requested hyperslab lies outside the resolved field's bounds.
    #[error("requested hyperslab {requested} is outside field bounds {bounds}")]
    Range { requested: String, bounds: String },

    /// More simultaneously mapped axes than the expansion kernel supports.
    #[error("{rank} mapped axes requested but at most {max} are supported")]
    UnsupportedRank { rank: usize, max: usize },

    /// The named field (or adjusted-field identity) is unknown to the dataset.
    #[error("field not found: {0}")]
    FieldNotFound(String),

    /// The container/metadata layer failed to deliver what it promised.
    #[error("provider error: {0}")]
    Provider(String),
}

impl SwathError {
    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a Range error.
    pub fn range(requested: impl Into<String>, bounds: impl Into<String>) -> Self {
        Self::Range {
            requested: requested.into(),
            bounds: bounds.into(),
        }
    }

    /// Create a Provider error.
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}

impl From<std::io::Error> for SwathError {
    fn from(err: std::io::Error) -> Self {
        Self::Provider(err.to_string())
    }
}
