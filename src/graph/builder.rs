//! Link-set construction

use crate::error::{ClusterError, Result};
use crate::graph::links::Link;
use crate::graph::registry::NodeRegistry;
use crate::similarity::Similarity;
use itertools::Itertools;
use rayon::prelude::*;

/// Builds one link per unordered pair of registry nodes
pub struct LinkSetBuilder<'a, S: Similarity + ?Sized> {
    /// Nodes to pair up
    registry: &'a NodeRegistry,

    /// Pairwise score supplier
    similarity: &'a S,

    /// Item count from which pairs are scored in parallel
    parallel_min_items: usize,
}

impl<'a, S: Similarity + ?Sized> LinkSetBuilder<'a, S> {
    /// Create a builder over the given registry
    pub fn new(registry: &'a NodeRegistry, similarity: &'a S) -> Self {
        Self {
            registry,
            similarity,
            parallel_min_items: usize::MAX,
        }
    }

    /// Score pairs on the rayon pool once the registry holds at least
    /// `min_items` nodes
    pub fn with_parallel_min_items(mut self, min_items: usize) -> Self {
        self.parallel_min_items = min_items;
        self
    }

    /// Build the C(N, 2) links, `(i, j)` with `i < j` in registry order.
    ///
    /// The first similarity failure (or non-finite score) aborts the build.
    pub fn build(&self) -> Result<Vec<Link>> {
        let n = self.registry.len() as u32;

        // For small item sets, use sequential processing
        if (n as usize) < self.parallel_min_items {
            return (0..n)
                .tuple_combinations::<(u32, u32)>()
                .map(|(i, j)| self.score_pair(i, j))
                .collect();
        }

        log::debug!("Scoring {} items on the rayon pool", n);

        // Rayon keeps the sequential order when collecting
        (0..n)
            .into_par_iter()
            .flat_map_iter(|i| ((i + 1)..n).map(move |j| (i, j)))
            .map(|(i, j)| self.score_pair(i, j))
            .collect()
    }

    fn score_pair(&self, i: u32, j: u32) -> Result<Link> {
        let nodes = self.registry.nodes();
        let (a, b) = match (nodes.get(i as usize), nodes.get(j as usize)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(ClusterError::InvariantViolation {
                    phase: "link construction",
                    message: format!("pair ({}, {}) outside registry of {}", i, j, nodes.len()),
                })
            }
        };

        let score = self
            .similarity
            .similarity(&a.name, &b.name)
            .map_err(|e| ClusterError::SimilarityComputationFailure {
                source_name: a.name.clone(),
                target_name: b.name.clone(),
                reason: e.to_string(),
            })?;

        if !score.is_finite() {
            return Err(ClusterError::SimilarityComputationFailure {
                source_name: a.name.clone(),
                target_name: b.name.clone(),
                reason: format!("non-finite score {}", score),
            });
        }

        Ok(Link::new(i, j, score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimilarityError;
    use std::collections::HashMap;

    fn registry(n: usize) -> NodeRegistry {
        let names: Vec<String> = (0..n).map(|i| format!("item{}", i)).collect();
        let weights: HashMap<String, f64> = names.iter().map(|n| (n.clone(), 1.0)).collect();
        NodeRegistry::from_items(&names, &weights).unwrap()
    }

    fn name_length_gap(a: &str, b: &str) -> std::result::Result<f64, SimilarityError> {
        Ok((a.len() as f64 - b.len() as f64).abs())
    }

    #[test]
    fn builds_every_unordered_pair_once() {
        let registry = registry(5);
        let links = LinkSetBuilder::new(&registry, &name_length_gap).build().unwrap();

        assert_eq!(links.len(), 10);
        assert!(links.iter().all(|l| l.source < l.target));

        let pairs: Vec<(u32, u32)> = links.iter().map(|l| (l.source, l.target)).collect();
        assert_eq!(pairs[0], (0, 1));
        assert_eq!(pairs[9], (3, 4));
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let registry = registry(40);
        let sequential = LinkSetBuilder::new(&registry, &name_length_gap).build().unwrap();
        let parallel = LinkSetBuilder::new(&registry, &name_length_gap)
            .with_parallel_min_items(1)
            .build()
            .unwrap();

        assert_eq!(sequential.len(), 780);
        assert_eq!(sequential.len(), parallel.len());
        for (s, p) in sequential.iter().zip(&parallel) {
            assert_eq!((s.source, s.target, s.score), (p.source, p.target, p.score));
        }
    }

    #[test]
    fn empty_and_single_item_sets_have_no_links() {
        assert!(LinkSetBuilder::new(&registry(0), &name_length_gap).build().unwrap().is_empty());
        assert!(LinkSetBuilder::new(&registry(1), &name_length_gap).build().unwrap().is_empty());
    }

    #[test]
    fn similarity_failure_aborts_build() {
        let registry = registry(4);
        let failing = |a: &str, b: &str| -> std::result::Result<f64, SimilarityError> {
            if a == "item1" && b == "item2" {
                Err(SimilarityError("no overlap".to_string()))
            } else {
                Ok(0.5)
            }
        };

        let err = LinkSetBuilder::new(&registry, &failing).build().unwrap_err();
        match err {
            ClusterError::SimilarityComputationFailure { source_name, target_name, reason } => {
                assert_eq!(source_name, "item1");
                assert_eq!(target_name, "item2");
                assert_eq!(reason, "no overlap");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nan_score_is_a_similarity_failure() {
        let registry = registry(3);
        let nan = |_: &str, _: &str| -> std::result::Result<f64, SimilarityError> { Ok(f64::NAN) };

        let err = LinkSetBuilder::new(&registry, &nan)
            .with_parallel_min_items(1)
            .build()
            .unwrap_err();
        assert!(matches!(err, ClusterError::SimilarityComputationFailure { .. }));
    }
}
