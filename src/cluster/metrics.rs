//! Cluster statistics and metrics

use crate::cluster::Clustering;
use serde::{Serialize, Deserialize};

/// Size statistics over the clusters of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub item_count: usize,
    pub cluster_count: usize,
    /// Clusters holding a single item
    pub singleton_count: usize,
    pub largest_cluster_size: usize,
    pub smallest_cluster_size: usize,
    pub avg_cluster_size: f64,
}

/// Calculate size statistics for a clustering
pub fn summarize(clustering: &Clustering) -> ClusterSummary {
    let sizes: Vec<usize> = clustering.clusters.iter().map(|c| c.size).collect();
    let item_count: usize = sizes.iter().sum();

    ClusterSummary {
        item_count,
        cluster_count: sizes.len(),
        singleton_count: sizes.iter().filter(|&&size| size == 1).count(),
        largest_cluster_size: sizes.iter().copied().max().unwrap_or(0),
        smallest_cluster_size: sizes.iter().copied().min().unwrap_or(0),
        avg_cluster_size: item_count as f64 / if sizes.is_empty() { 1.0 } else { sizes.len() as f64 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::Cluster;
    use crate::graph::Node;

    fn cluster(id: u32, members: Vec<u32>) -> Cluster {
        Cluster {
            id,
            name: format!("c{}", id),
            founder: members[0],
            representative: members[0],
            weight: 1.0,
            size: members.len(),
            members,
        }
    }

    #[test]
    fn summarizes_cluster_sizes() {
        let clustering = Clustering {
            nodes: (0..6).map(|i| Node::new(format!("n{}", i), 1.0)).collect(),
            clusters: vec![cluster(0, vec![0, 1, 2, 3]), cluster(1, vec![4]), cluster(2, vec![5])],
            threshold: 0.5,
            link_count: 15,
            merges: 3,
        };

        let summary = summarize(&clustering);

        assert_eq!(summary.item_count, 6);
        assert_eq!(summary.cluster_count, 3);
        assert_eq!(summary.singleton_count, 2);
        assert_eq!(summary.largest_cluster_size, 4);
        assert_eq!(summary.smallest_cluster_size, 1);
        assert_eq!(summary.avg_cluster_size, 2.0);
    }

    #[test]
    fn empty_clustering_has_zero_sizes() {
        let clustering = Clustering {
            nodes: Vec::new(),
            clusters: Vec::new(),
            threshold: 0.5,
            link_count: 0,
            merges: 0,
        };

        let summary = summarize(&clustering);
        assert_eq!(summary.cluster_count, 0);
        assert_eq!(summary.avg_cluster_size, 0.0);
    }
}
