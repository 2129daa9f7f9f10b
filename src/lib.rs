//! Threshold link clustering of named items
//!
//! Items are paired exhaustively, each pair scored by a caller-supplied
//! similarity function, and items joined by links at or above a threshold are
//! merged into clusters, each labelled by its highest-weight member.

pub mod config;
pub mod error;
pub mod similarity;
pub mod data;
pub mod graph;
pub mod cluster;
pub mod report;
pub mod storage;

pub use cluster::detection::cluster_items;
pub use cluster::{Cluster, Clustering};
pub use config::Config;
pub use error::{ClusterError, Result, SimilarityError};
pub use similarity::Similarity;
