//! Pairwise similarity functions supplied to a clustering run

use crate::error::SimilarityError;

/// A pure, deterministic pairwise similarity score over item names.
///
/// Implementations must be callable for any two names of the item set. The
/// score is compared against the run's threshold, so it must be expressed in
/// the same units (a correlation in `[-1, 1]`, a ratio in `[0, 100]`, ...).
pub trait Similarity: Sync {
    /// Score the pair `(a, b)`.
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError>;
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> Result<f64, SimilarityError> + Sync,
{
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError> {
        self(a, b)
    }
}
