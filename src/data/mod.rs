//! Input loading: item names, weights and similarity functions

pub mod columns;
pub mod labels;

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use anyhow::{Context, Result};

/// Load a JSON object mapping item names to weights
pub fn load_weights(path: &str) -> Result<HashMap<String, f64>> {
    log::info!("Reading weights from {}", path);

    let file = File::open(path).with_context(|| format!("Failed to open weights file {}", path))?;
    let weights: HashMap<String, f64> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Weights file {} is not a JSON object of numbers", path))?;

    Ok(weights)
}
