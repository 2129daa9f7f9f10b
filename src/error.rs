//! Error types for clustering runs

use thiserror::Error;

/// Errors returned by a clustering run.
///
/// Every variant is fatal to the run that produced it: there are no partial
/// results.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The item collection, weights or threshold are unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The similarity function failed for a pair during link construction
    /// or reporting.
    #[error("similarity computation failed for ({source_name}, {target_name}): {reason}")]
    SimilarityComputationFailure {
        /// Name of the first item of the pair.
        source_name: String,
        /// Name of the second item of the pair.
        target_name: String,
        /// What the similarity function reported.
        reason: String,
    },

    /// Internal consistency failure in the node registry or cluster partition.
    #[error("invariant violation during {phase}: {message}")]
    InvariantViolation {
        /// Phase of the run that detected the problem.
        phase: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// Filesystem failure while exporting results.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization failure while exporting results.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Error reported by a similarity function for a single pair.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct SimilarityError(pub String);

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, ClusterError>;
