//! Configuration management for clustering runs

use crate::error::{ClusterError, Result};

/// Default correlation threshold for column clustering
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.4;

/// Default ratio threshold for label clustering (ratios span 0..=100)
pub const DEFAULT_RATIO_THRESHOLD: f64 = 80.0;

/// Settings for one clustering run
#[derive(Debug, Clone)]
pub struct Config {
    /// Minimum link score for merging the clusters of its endpoints
    pub threshold: f64,

    /// Item count from which link scores are computed in parallel
    pub parallel_min_items: usize,

    /// Decimal places used for weights and scores in the report
    pub precision: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CORRELATION_THRESHOLD,
            parallel_min_items: 1000,
            precision: 3,
        }
    }
}

impl Config {
    /// Create a new configuration with the given threshold
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Defaults for clustering text labels by similarity ratio
    pub fn for_labels() -> Self {
        Self {
            threshold: DEFAULT_RATIO_THRESHOLD,
            precision: 1,
            ..Self::default()
        }
    }

    /// Check the settings before a run
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() {
            return Err(ClusterError::InvalidInput(format!(
                "threshold must be finite, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_defaults_use_ratio_scale() {
        let config = Config::for_labels();
        assert_eq!(config.threshold, 80.0);
        assert_eq!(config.parallel_min_items, Config::default().parallel_min_items);
    }

    #[test]
    fn nan_threshold_is_invalid() {
        assert!(Config::new(f64::NAN).validate().is_err());
        assert!(Config::new(-1.0).validate().is_ok());
    }
}
