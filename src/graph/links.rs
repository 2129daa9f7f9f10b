//! Weighted pairwise links between registry nodes

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One unordered pair of nodes with its similarity score.
///
/// `source < target` always holds: the order reflects pair enumeration, not
/// direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Link {
    /// Registry index of the first node of the pair
    pub source: u32,

    /// Registry index of the second node of the pair
    pub target: u32,

    /// Similarity score
    pub score: f64,
}

impl Link {
    pub fn new(source: u32, target: u32, score: f64) -> Self {
        Self { source, target, score }
    }

    /// Processing order of the merge pass: higher score first, equal scores
    /// in enumeration order.
    pub fn cmp_rank(&self, other: &Link) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| (self.source, self.target).cmp(&(other.source, other.target)))
    }
}

/// Sort links into merge-pass order
pub fn sort_descending(links: &mut [Link]) {
    links.sort_unstable_by(Link::cmp_rank);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_by_descending_score() {
        let mut links = vec![
            Link::new(0, 2, 0.1),
            Link::new(0, 1, 0.9),
            Link::new(1, 2, 0.8),
        ];
        sort_descending(&mut links);

        let scores: Vec<f64> = links.iter().map(|l| l.score).collect();
        assert_eq!(scores, vec![0.9, 0.8, 0.1]);
    }

    #[test]
    fn ties_follow_enumeration_order() {
        let mut links = vec![
            Link::new(1, 2, 0.5),
            Link::new(0, 2, 0.5),
            Link::new(0, 1, 0.5),
        ];
        sort_descending(&mut links);

        let pairs: Vec<(u32, u32)> = links.iter().map(|l| (l.source, l.target)).collect();
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }
}
