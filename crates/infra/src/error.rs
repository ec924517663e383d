//! Storage error model.

use thiserror::Error;

/// Persistence operation error.
///
/// These are **infrastructure errors** as opposed to domain errors
/// (validation, missing records).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn io(key: &str, source: std::io::Error) -> Self {
        Self::Io {
            key: key.to_string(),
            source,
        }
    }
}
