//! Threshold clustering: greedy merge over links in descending score order

use crate::cluster::{Cluster, Clustering};
use crate::config::Config;
use crate::error::{ClusterError, Result};
use crate::graph::links::{self, Link};
use crate::graph::{LinkSetBuilder, Node, NodeRegistry};
use crate::similarity::Similarity;
use std::collections::HashMap;
use log;

/// Union-Find over node indices that also tracks, per set, the founding
/// node and the highest-weight node
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of node i)
    parent: Vec<u32>,

    /// Size of each set (for union by size)
    rank: Vec<u32>,

    /// Founder of the set rooted at i
    founder: Vec<u32>,

    /// Highest-weight member of the set rooted at i
    representative: Vec<u32>,
}

impl DisjointSets {
    /// Create a new DisjointSets data structure of singletons
    pub fn new(size: usize) -> Self {
        let mut parent = Vec::with_capacity(size);
        let mut rank = Vec::with_capacity(size);

        // Initialize each node as its own set
        for i in 0..size {
            parent.push(i as u32);
            rank.push(1);
        }

        Self {
            founder: parent.clone(),
            representative: parent.clone(),
            parent,
            rank,
        }
    }

    /// Number of nodes covered
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Find the root of the set containing x with path compression
    pub fn find(&mut self, x: u32) -> u32 {
        let px = self.parent[x as usize];
        if px != x {
            // Path compression: set parent to root
            self.parent[x as usize] = self.find(px);
        }
        self.parent[x as usize]
    }

    /// Merge the set containing `target` into the set containing `source`.
    ///
    /// The merged set keeps the source-side founder. Its representative is
    /// the target-side representative only if that one is strictly heavier.
    /// Returns false when both are already in the same set.
    pub fn merge(&mut self, source: u32, target: u32, nodes: &[Node]) -> bool {
        let root_s = self.find(source);
        let root_t = self.find(target);

        if root_s == root_t {
            return false; // Already in the same set
        }

        let founder = self.founder[root_s as usize];
        let rep_s = self.representative[root_s as usize];
        let rep_t = self.representative[root_t as usize];
        let representative = if nodes[rep_t as usize].cmp_weight(&nodes[rep_s as usize]).is_gt() {
            rep_t
        } else {
            rep_s
        };

        // Union by size: attach smaller tree under root of larger tree
        let root = if self.rank[root_s as usize] >= self.rank[root_t as usize] {
            self.parent[root_t as usize] = root_s;
            self.rank[root_s as usize] += self.rank[root_t as usize];
            root_s
        } else {
            self.parent[root_s as usize] = root_t;
            self.rank[root_t as usize] += self.rank[root_s as usize];
            root_t
        };

        self.founder[root as usize] = founder;
        self.representative[root as usize] = representative;

        true
    }

    /// Get the size of the set containing x
    pub fn size(&mut self, x: u32) -> u32 {
        let root = self.find(x);
        self.rank[root as usize]
    }

    /// Founder of the set containing x
    pub fn founder(&mut self, x: u32) -> u32 {
        let root = self.find(x);
        self.founder[root as usize]
    }

    /// Highest-weight member of the set containing x
    pub fn representative(&mut self, x: u32) -> u32 {
        let root = self.find(x);
        self.representative[root as usize]
    }
}

/// Consume links in merge-pass order until the first one below `threshold`.
///
/// `links` must already be sorted with [`links::sort_descending`]. Returns
/// the number of merges performed.
pub fn merge_links(
    sets: &mut DisjointSets,
    nodes: &[Node],
    sorted_links: &[Link],
    threshold: f64,
) -> Result<usize> {
    if nodes.len() != sets.len() {
        return Err(ClusterError::InvariantViolation {
            phase: "merge",
            message: format!("{} nodes for disjoint sets over {}", nodes.len(), sets.len()),
        });
    }

    let mut merges = 0;

    for link in sorted_links {
        if link.score < threshold {
            log::debug!("Reached score {:.3} below threshold {}", link.score, threshold);
            break;
        }

        if link.source as usize >= sets.len() || link.target as usize >= sets.len() {
            return Err(ClusterError::InvariantViolation {
                phase: "merge",
                message: format!(
                    "link ({}, {}) references a node outside the registry of {}",
                    link.source,
                    link.target,
                    sets.len()
                ),
            });
        }

        if sets.merge(link.source, link.target, nodes) {
            merges += 1;
            log::debug!(
                "Merged {} <- {:.3} -> {}",
                nodes[link.source as usize].name,
                link.score,
                nodes[link.target as usize].name
            );
        }
    }

    Ok(merges)
}

/// Group nodes by set and order the groups by descending representative
/// weight, then founder name
fn collect_clusters(sets: &mut DisjointSets, nodes: &[Node]) -> Result<Vec<Cluster>> {
    let mut root_to_group: HashMap<u32, usize> = HashMap::new();
    let mut groups: Vec<(u32, Vec<u32>)> = Vec::new();

    for node in 0..sets.len() as u32 {
        let root = sets.find(node);
        let group = *root_to_group.entry(root).or_insert_with(|| {
            groups.push((root, Vec::new()));
            groups.len() - 1
        });
        groups[group].1.push(node);
    }

    let mut clusters = Vec::with_capacity(groups.len());
    for (root, members) in groups {
        if sets.size(root) as usize != members.len() {
            return Err(ClusterError::InvariantViolation {
                phase: "cluster collection",
                message: format!(
                    "set of {} tracks size {} but owns {} nodes",
                    nodes[root as usize].name,
                    sets.size(root),
                    members.len()
                ),
            });
        }

        let founder = sets.founder(root);
        let representative = sets.representative(root);
        if !members.contains(&representative) || !members.contains(&founder) {
            return Err(ClusterError::InvariantViolation {
                phase: "cluster collection",
                message: format!("set of {} lost its founder or representative", nodes[root as usize].name),
            });
        }

        clusters.push(Cluster {
            id: 0,
            name: nodes[founder as usize].name.clone(),
            founder,
            representative,
            weight: nodes[representative as usize].weight,
            size: members.len(),
            members,
        });
    }

    clusters.sort_by(|a, b| b.weight.total_cmp(&a.weight).then_with(|| a.name.cmp(&b.name)));
    for (id, cluster) in clusters.iter_mut().enumerate() {
        cluster.id = id as u32;
    }

    Ok(clusters)
}

/// Cluster an ordered item collection.
///
/// Builds one node per name, one link per unordered pair scored by
/// `similarity`, then merges greedily from the highest score down to
/// `config.threshold`. An empty collection yields an empty clustering.
pub fn cluster_items<N, S>(
    names: &[N],
    weights: &HashMap<String, f64>,
    similarity: &S,
    config: &Config,
) -> Result<Clustering>
where
    N: AsRef<str>,
    S: Similarity + ?Sized,
{
    config.validate()?;

    let registry = NodeRegistry::from_items(names, weights)?;
    log::info!("Registered {} items", registry.len());

    let mut links = LinkSetBuilder::new(&registry, similarity)
        .with_parallel_min_items(config.parallel_min_items)
        .build()?;
    log::info!("Built {} links", links.len());

    links::sort_descending(&mut links);

    let mut sets = DisjointSets::new(registry.len());
    let merges = merge_links(&mut sets, registry.nodes(), &links, config.threshold)?;

    let clusters = collect_clusters(&mut sets, registry.nodes())?;
    log::info!(
        "Found {} clusters at threshold {} after {} merges",
        clusters.len(),
        config.threshold,
        merges
    );

    Ok(Clustering {
        nodes: registry.into_nodes(),
        clusters,
        threshold: config.threshold,
        link_count: links.len(),
        merges,
    })
}
