//! Numeric column loading, correlation and ROC weights

use std::collections::HashMap;
use std::path::Path;
use anyhow::{anyhow, Result};
use itertools::Itertools;
use ndarray::Array2;
use polars::prelude::*;
use statrs::statistics::Statistics;
use crate::error::SimilarityError;
use crate::similarity::Similarity;
use log;

/// One numeric column of the input table; nulls are stored as NaN
#[derive(Debug, Clone)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<f64>,
}

impl NumericColumn {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Sample standard deviation over the non-null values
    fn std_dev(&self) -> f64 {
        self.values.iter().copied().filter(|v| v.is_finite()).std_dev()
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Read a CSV or Parquet table
fn read_table(path: &str) -> Result<DataFrame> {
    if !Path::new(path).exists() {
        return Err(anyhow!("File not found: {}", path));
    }

    let df = if path.ends_with(".parquet") {
        log::info!("Reading parquet file: {}", path);
        LazyFrame::scan_parquet(path, Default::default())?.collect()?
    } else {
        log::info!("Reading CSV file: {}", path);
        CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.into()))?
            .finish()?
    };

    log::info!("Loaded table with {} rows and {} columns", df.height(), df.width());

    Ok(df)
}

/// Load every numeric column of a CSV or Parquet file as `f64`
pub fn load_numeric_columns(path: &str) -> Result<Vec<NumericColumn>> {
    let df = read_table(path)?;
    let mut columns = Vec::with_capacity(df.width());

    for column in df.get_columns() {
        if !is_numeric(column.dtype()) {
            log::debug!("Skipping non-numeric column {} ({})", column.name(), column.dtype());
            continue;
        }

        let cast = column.cast(&DataType::Float64)?;
        let values: Vec<f64> = cast
            .f64()?
            .into_iter()
            .map(|v| v.unwrap_or(f64::NAN))
            .collect();

        columns.push(NumericColumn::new(column.name().to_string(), values));
    }

    log::info!("Found {} numeric columns", columns.len());

    Ok(columns)
}

/// Drop columns whose values do not vary; their correlation is undefined
pub fn drop_constant_columns(columns: Vec<NumericColumn>) -> Vec<NumericColumn> {
    columns
        .into_iter()
        .filter(|column| {
            let keep = column.std_dev() > 0.0;
            if !keep {
                log::warn!("Dropping column {}: no variance", column.name);
            }
            keep
        })
        .collect()
}

/// Pearson correlation over the rows where both values are present.
///
/// NaN when fewer than two such rows exist or either side is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(a, b)| (*a, *b))
        .unzip();

    if xs.len() < 2 {
        return f64::NAN;
    }

    let sx = xs.iter().std_dev();
    let sy = ys.iter().std_dev();
    if sx == 0.0 || sy == 0.0 {
        return f64::NAN;
    }

    xs.iter().covariance(ys.iter()) / (sx * sy)
}

/// Symmetric matrix of pairwise Pearson correlations between named columns
#[derive(Debug, Clone)]
pub struct CorrelationMatrix {
    names: Vec<String>,
    index: HashMap<String, usize>,
    values: Array2<f64>,
}

impl CorrelationMatrix {
    /// Compute the correlation of every column pair
    pub fn from_columns(columns: &[NumericColumn]) -> Self {
        let n = columns.len();
        let mut values = Array2::<f64>::from_elem((n, n), 1.0);

        for (i, j) in (0..n).tuple_combinations::<(usize, usize)>() {
            let r = pearson(&columns[i].values, &columns[j].values);
            values[[i, j]] = r;
            values[[j, i]] = r;
        }

        let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
        let index = names.iter().enumerate().map(|(i, n)| (n.clone(), i)).collect();

        Self { names, index, values }
    }

    /// Column names in input order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Correlation between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = *self.index.get(a)?;
        let j = *self.index.get(b)?;
        Some(self.values[[i, j]])
    }
}

impl Similarity for CorrelationMatrix {
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError> {
        match self.get(a, b) {
            Some(r) if r.is_nan() => {
                log::warn!("Correlation between {} and {} is undefined on their shared rows", a, b);
                Err(SimilarityError(format!(
                    "correlation between {} and {} is undefined",
                    a, b
                )))
            }
            Some(r) => Ok(r),
            None => Err(SimilarityError(format!("unknown column pair ({}, {})", a, b))),
        }
    }
}

/// Area under the ROC curve of `scores` against binary `labels`.
///
/// Uses the rank-sum formulation with average ranks for tied scores; rows
/// with a missing score or label are ignored. `None` when either class is
/// absent.
pub fn roc_auc(scores: &[f64], labels: &[Option<bool>]) -> Option<f64> {
    let mut rows: Vec<(f64, bool)> = scores
        .iter()
        .zip(labels)
        .filter_map(|(&s, &l)| match l {
            Some(l) if s.is_finite() => Some((s, l)),
            _ => None,
        })
        .collect();

    let positives = rows.iter().filter(|(_, l)| *l).count();
    let negatives = rows.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    rows.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < rows.len() {
        let mut end = start;
        while end + 1 < rows.len() && rows[end + 1].0 == rows[start].0 {
            end += 1;
        }
        // Ranks are 1-based; a tie group shares the mean of its ranks
        let rank = (start + end) as f64 / 2.0 + 1.0;
        positive_rank_sum += rank * rows[start..=end].iter().filter(|(_, l)| *l).count() as f64;
        start = end + 1;
    }

    let p = positives as f64;
    Some((positive_rank_sum - p * (p + 1.0) / 2.0) / (p * negatives as f64))
}

/// Split off the binary target column and weight each remaining column by
/// its ROC AUC against it.
///
/// Target values of 0 are negatives, any other value a positive; missing
/// values are ignored.
pub fn roc_weights(
    columns: Vec<NumericColumn>,
    target: &str,
) -> Result<(Vec<NumericColumn>, HashMap<String, f64>)> {
    let (targets, features): (Vec<NumericColumn>, Vec<NumericColumn>) =
        columns.into_iter().partition(|c| c.name == target);
    let target_column = targets
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Target column {} not found among numeric columns", target))?;

    let labels: Vec<Option<bool>> = target_column
        .values
        .iter()
        .map(|&v| if v.is_finite() { Some(v != 0.0) } else { None })
        .collect();

    let mut weights = HashMap::with_capacity(features.len());
    for column in &features {
        let auc = roc_auc(&column.values, &labels)
            .ok_or_else(|| anyhow!("Target column {} does not contain both classes", target))?;
        log::debug!("ROC AUC {:.3} {}", auc, column.name);
        weights.insert(column.name.clone(), auc);
    }

    Ok((features, weights))
}
