//! Results persistence module

use crate::cluster::metrics;
use crate::cluster::Clustering;
use crate::error::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use serde_json::{json, to_string_pretty};

/// Save clustering results to the specified directory
pub fn save_results(clustering: &Clustering, output_dir: &str) -> Result<()> {
    log::info!("Saving {} clusters to {}", clustering.cluster_count(), output_dir);

    // Ensure output directory exists
    fs::create_dir_all(output_dir)?;

    save_summary(clustering, output_dir)?;
    save_clusters(clustering, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save run parameters and cluster size statistics
fn save_summary(clustering: &Clustering, output_dir: &str) -> Result<()> {
    log::info!("Saving summary information");

    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let stats = metrics::summarize(clustering);
    let summary = json!({
        "run": {
            "threshold": clustering.threshold,
            "item_count": clustering.nodes.len(),
            "link_count": clustering.link_count,
            "merges": clustering.merges,
        },
        "cluster_stats": stats,
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Save every cluster with resolved member names
fn save_clusters(clustering: &Clustering, output_dir: &str) -> Result<()> {
    log::info!("Saving individual cluster information");

    let path = Path::new(output_dir).join("clusters.json");
    let mut file = File::create(path)?;

    let clusters_json = json!({
        "clusters": clustering.clusters.iter().map(|c| {
            json!({
                "id": c.id,
                "name": c.name,
                "size": c.size,
                "representative": clustering.representative(c).map(|n| n.name.as_str()),
                "weight": c.weight,
                "members": clustering.member_names(c).collect::<Vec<_>>(),
            })
        }).collect::<Vec<_>>()
    });

    file.write_all(to_string_pretty(&clusters_json)?.as_bytes())?;

    Ok(())
}
