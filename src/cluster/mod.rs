//! Cluster analysis module

pub mod detection;
pub mod metrics;

use crate::graph::Node;
use serde::{Serialize, Deserialize};

/// A group of items connected by links at or above the threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Position of this cluster in report order
    pub id: u32,

    /// Name of the founding item; fixed when the cluster is created
    pub name: String,

    /// Node index of the founding item
    pub founder: u32,

    /// Node index of the highest-weight member
    pub representative: u32,

    /// Weight of the representative
    pub weight: f64,

    /// Members of this cluster (node indices, input order)
    pub members: Vec<u32>,

    /// Size of the cluster
    pub size: usize,
}

/// Outcome of one clustering run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clustering {
    /// Nodes of the run in input order
    pub nodes: Vec<Node>,

    /// Final clusters, by descending representative weight
    pub clusters: Vec<Cluster>,

    /// Threshold the run was made with
    pub threshold: f64,

    /// Number of links built
    pub link_count: usize,

    /// Number of merges performed
    pub merges: usize,
}

impl Clustering {
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Node at the given index
    pub fn node(&self, idx: u32) -> Option<&Node> {
        self.nodes.get(idx as usize)
    }

    /// Representative node of a cluster
    pub fn representative(&self, cluster: &Cluster) -> Option<&Node> {
        self.node(cluster.representative)
    }

    /// Member names of a cluster, in input order
    pub fn member_names<'a>(&'a self, cluster: &'a Cluster) -> impl Iterator<Item = &'a str> + 'a {
        cluster
            .members
            .iter()
            .filter_map(move |&idx| self.node(idx))
            .map(|node| node.name.as_str())
    }

    /// Cluster containing the named item
    pub fn cluster_of(&self, name: &str) -> Option<&Cluster> {
        self.clusters
            .iter()
            .find(|cluster| self.member_names(cluster).any(|member| member == name))
    }
}
