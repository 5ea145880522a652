//! Error types for the clustering engine.

use thiserror::Error;

/// Errors raised by geocluster.
///
/// Backend failures are normally absorbed by [`crate::Clusterer`] and turned
/// into an empty result; the remaining variants reach the caller.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Search backend error: {0}")]
    Backend(String),

    /// A group reached a state that correct ingestion never produces.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Geohash error: {0}")]
    Geohash(#[from] geohash::GeohashError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
