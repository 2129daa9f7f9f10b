//! Text report of a clustering run

use crate::cluster::{Cluster, Clustering};
use crate::error::{ClusterError, Result};
use crate::similarity::Similarity;
use std::io::Write;

/// Write the report: cluster count, a header, then one line per cluster in
/// report order.
///
/// Each cluster line reads `<size> <founder> | <weight> <representative>`.
/// With `similarity`, every non-representative member follows on its own
/// indented line with its score against the founder, recomputed here.
pub fn write_report<W: Write>(
    out: &mut W,
    clustering: &Clustering,
    similarity: Option<&dyn Similarity>,
    precision: usize,
) -> Result<()> {
    writeln!(out, "{}", clustering.cluster_count())?;
    writeln!(out, "Clusters for threshold {}", clustering.threshold)?;
    writeln!(out, "---------------------------------------")?;

    for cluster in &clustering.clusters {
        write_cluster(out, clustering, cluster, precision)?;

        if let Some(similarity) = similarity {
            write_member_scores(out, clustering, cluster, similarity, precision)?;
        }
    }

    Ok(())
}

/// Render the report into a string
pub fn render_report(
    clustering: &Clustering,
    similarity: Option<&dyn Similarity>,
    precision: usize,
) -> Result<String> {
    let mut buffer = Vec::new();
    write_report(&mut buffer, clustering, similarity, precision)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn write_cluster<W: Write>(
    out: &mut W,
    clustering: &Clustering,
    cluster: &Cluster,
    precision: usize,
) -> Result<()> {
    let representative = clustering.representative(cluster).ok_or_else(|| {
        ClusterError::InvariantViolation {
            phase: "report",
            message: format!("cluster {} has no representative node", cluster.name),
        }
    })?;

    writeln!(
        out,
        "{} {} | {:.*} {}",
        cluster.size, cluster.name, precision, representative.weight, representative.name
    )?;

    Ok(())
}

fn write_member_scores<W: Write>(
    out: &mut W,
    clustering: &Clustering,
    cluster: &Cluster,
    similarity: &dyn Similarity,
    precision: usize,
) -> Result<()> {
    for &member in cluster.members.iter().filter(|&&m| m != cluster.representative) {
        let Some(node) = clustering.node(member) else {
            return Err(ClusterError::InvariantViolation {
                phase: "report",
                message: format!("cluster {} lists unknown node {}", cluster.name, member),
            });
        };

        let score = similarity.similarity(&cluster.name, &node.name).map_err(|e| {
            ClusterError::SimilarityComputationFailure {
                source_name: cluster.name.clone(),
                target_name: node.name.clone(),
                reason: e.to_string(),
            }
        })?;

        writeln!(out, "    {:.*} {}", precision, score, node.name)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::cluster::detection::cluster_items;
    use crate::error::SimilarityError;
    use std::collections::HashMap;

    fn shared_prefix(a: &str, b: &str) -> std::result::Result<f64, SimilarityError> {
        let common = a.chars().zip(b.chars()).take_while(|(x, y)| x == y).count();
        Ok(100.0 * common as f64 / a.len().max(b.len()).max(1) as f64)
    }

    fn weights(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(n, w)| (n.to_string(), *w)).collect()
    }

    #[test]
    fn renders_clusters_by_descending_weight() {
        let w = weights(&[("abcd", 1.0), ("abce", 3.0), ("zzzz", 2.0)]);
        let clustering =
            cluster_items(&["abcd", "abce", "zzzz"], &w, &shared_prefix, &Config::new(70.0)).unwrap();

        let report = render_report(&clustering, None, 3).unwrap();

        assert_eq!(
            report,
            "2\n\
             Clusters for threshold 70\n\
             ---------------------------------------\n\
             2 abcd | 3.000 abce\n\
             1 zzzz | 2.000 zzzz\n"
        );
    }

    #[test]
    fn text_variant_lists_member_scores_against_founder() {
        let w = weights(&[("abcd", 1.0), ("abce", 3.0), ("abcf", 2.0)]);
        let clustering =
            cluster_items(&["abcd", "abce", "abcf"], &w, &shared_prefix, &Config::new(70.0)).unwrap();

        let report = render_report(&clustering, Some(&shared_prefix), 1).unwrap();
        let lines: Vec<&str> = report.lines().collect();

        assert_eq!(lines[3], "3 abcd | 3.0 abce");
        assert_eq!(lines[4], "    100.0 abcd");
        assert_eq!(lines[5], "    75.0 abcf");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn report_time_similarity_failure_is_propagated() {
        let w = weights(&[("a", 1.0), ("b", 2.0)]);
        let clustering = cluster_items(&["a", "b"], &w, &shared_prefix, &Config::new(-1.0)).unwrap();
        let failing = |_: &str, _: &str| -> std::result::Result<f64, SimilarityError> {
            Err(SimilarityError("scorer offline".to_string()))
        };

        let err = render_report(&clustering, Some(&failing), 1).unwrap_err();
        assert!(matches!(err, ClusterError::SimilarityComputationFailure { .. }));
    }
}
