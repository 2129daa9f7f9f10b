//! Free-text labels and their similarity ratio

use std::collections::HashMap;
use anyhow::{Context, Result};
use crate::error::SimilarityError;
use crate::similarity::Similarity;

/// Distinct labels in first-seen order, with their occurrence counts
#[derive(Debug, Clone, Default)]
pub struct LabelSet {
    pub labels: Vec<String>,
    pub frequencies: HashMap<String, f64>,
}

impl LabelSet {
    /// Collect labels from lines, trimming them and skipping blank ones
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();

        for line in lines {
            let label = line.as_ref().trim();
            if label.is_empty() {
                continue;
            }

            match set.frequencies.get_mut(label) {
                Some(count) => *count += 1.0,
                None => {
                    set.labels.push(label.to_string());
                    set.frequencies.insert(label.to_string(), 1.0);
                }
            }
        }

        set
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Load labels from a text file, one per line
pub fn load_labels(path: &str) -> Result<LabelSet> {
    log::info!("Reading labels from {}", path);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read labels from {}", path))?;
    let set = LabelSet::from_lines(text.lines());

    log::info!("Found {} distinct labels", set.len());

    Ok(set)
}

/// Similarity ratio of two labels on a 0..=100 scale, from the normalized
/// Levenshtein distance
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelRatio;

impl Similarity for LabelRatio {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError> {
        Ok(100.0 * strsim::normalized_levenshtein(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_label_frequencies_in_first_seen_order() {
        let set = LabelSet::from_lines(["civic", " accord", "", "civic", "accord ", "civic"]);

        assert_eq!(set.labels, vec!["civic", "accord"]);
        assert_eq!(set.frequencies["civic"], 3.0);
        assert_eq!(set.frequencies["accord"], 2.0);
    }

    #[test]
    fn ratio_scale_spans_zero_to_hundred() {
        assert_eq!(LabelRatio.similarity("corolla", "corolla").unwrap(), 100.0);
        assert_eq!(LabelRatio.similarity("abc", "xyz").unwrap(), 0.0);

        let close = LabelRatio.similarity("chevrolet", "chevroelt").unwrap();
        assert!(close > 70.0 && close < 100.0);
    }

    #[test]
    fn load_labels_reads_one_label_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.txt");
        std::fs::write(&path, "ford pinto\nford pinto\ntoyota corona\n").unwrap();

        let set = load_labels(path.to_str().unwrap()).unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.frequencies["ford pinto"], 2.0);
    }
}
