//! Node registry: one node per distinct item name

use crate::error::{ClusterError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

/// One clusterable item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique item name
    pub name: String,

    /// Ranking weight (ROC score, frequency, ...)
    pub weight: f64,
}

impl Node {
    /// Create a node
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }

    /// Rank two nodes by weight only. Names play no part in ranking.
    pub fn cmp_weight(&self, other: &Node) -> Ordering {
        self.weight.total_cmp(&other.weight)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} {}", self.weight, self.name)
    }
}

/// Arena of nodes addressed by `u32` index, rejecting duplicate names
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    /// Mapping from item names to node indices
    id_to_index: HashMap<String, u32>,

    /// Nodes in input order
    nodes: Vec<Node>,
}

impl NodeRegistry {
    /// Create an empty registry with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            id_to_index: HashMap::with_capacity(capacity),
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Build the registry for an ordered item collection.
    ///
    /// Fails with `InvalidInput` on duplicate names, on a name with no
    /// weight, or on a non-finite weight.
    pub fn from_items<N: AsRef<str>>(names: &[N], weights: &HashMap<String, f64>) -> Result<Self> {
        let mut registry = Self::with_capacity(names.len());

        for name in names {
            let name = name.as_ref();
            let weight = *weights.get(name).ok_or_else(|| {
                ClusterError::InvalidInput(format!("no weight supplied for item '{}'", name))
            })?;
            registry.insert(Node::new(name, weight))?;
        }

        Ok(registry)
    }

    /// Register a node and return its index
    pub fn insert(&mut self, node: Node) -> Result<u32> {
        if self.id_to_index.contains_key(&node.name) {
            return Err(ClusterError::InvalidInput(format!(
                "duplicate item name '{}'",
                node.name
            )));
        }
        if !node.weight.is_finite() {
            return Err(ClusterError::InvalidInput(format!(
                "weight of item '{}' is not finite ({})",
                node.name, node.weight
            )));
        }

        let idx = self.nodes.len() as u32;
        self.id_to_index.insert(node.name.clone(), idx);
        self.nodes.push(node);

        Ok(idx)
    }

    /// Node at the given index
    pub fn get(&self, idx: u32) -> Option<&Node> {
        self.nodes.get(idx as usize)
    }

    /// All nodes in input order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of registered nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Consume the registry, keeping the nodes
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weights(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(n, w)| (n.to_string(), *w)).collect()
    }

    #[test]
    fn registry_keeps_input_order() {
        let w = weights(&[("b", 1.0), ("a", 2.0)]);
        let registry = NodeRegistry::from_items(&["b", "a"], &w).unwrap();

        assert_eq!(registry.len(), 2);
        let names: Vec<&str> = registry.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(registry.get(1).unwrap().weight, 2.0);
        assert!(registry.get(2).is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let w = weights(&[("a", 1.0)]);
        let err = NodeRegistry::from_items(&["a", "a"], &w).unwrap_err();
        assert!(matches!(err, ClusterError::InvalidInput(_)));
    }

    #[test]
    fn missing_weight_is_rejected() {
        let w = weights(&[("a", 1.0)]);
        let err = NodeRegistry::from_items(&["a", "b"], &w).unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn nan_weight_is_rejected() {
        let w = weights(&[("a", f64::NAN)]);
        assert!(NodeRegistry::from_items(&["a"], &w).is_err());
    }

    #[test]
    fn equal_weights_rank_equal_regardless_of_name() {
        let a = Node::new("a", 0.5);
        let b = Node::new("b", 0.5);
        assert_eq!(a.cmp_weight(&b), Ordering::Equal);
        assert_eq!(Node::new("c", 0.7).cmp_weight(&a), Ordering::Greater);
        assert_eq!(a.to_string(), "0.500 a");
    }
}
