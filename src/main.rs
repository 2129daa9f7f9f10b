use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use link_cluster_analyzer::cluster::metrics;
use link_cluster_analyzer::config::{Config, DEFAULT_CORRELATION_THRESHOLD, DEFAULT_RATIO_THRESHOLD};
use link_cluster_analyzer::data::columns::{self, CorrelationMatrix};
use link_cluster_analyzer::data::labels::{self, LabelRatio};
use link_cluster_analyzer::data::load_weights;
use link_cluster_analyzer::similarity::Similarity;
use link_cluster_analyzer::{cluster_items, report, storage, Clustering};
use std::collections::HashMap;

#[derive(Parser, Debug)]
#[clap(
    name = "link-cluster-analyzer",
    about = "Cluster similar items and keep the highest-weight item of each cluster"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Output directory for JSON results (skipped when absent)
    #[clap(long, global = true)]
    output_dir: Option<String>,

    /// Item count from which link scores are computed in parallel
    #[clap(long, global = true, default_value = "1000")]
    parallel_min_items: usize,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, global = true, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cluster the numeric columns of a table by correlation
    Columns(ColumnsArgs),

    /// Cluster text labels by similarity ratio
    Labels(LabelsArgs),
}

#[derive(Args, Debug)]
struct ColumnsArgs {
    /// Path to input CSV or Parquet file
    #[clap(long)]
    input: String,

    /// Binary target column; columns are weighted by ROC AUC against it
    #[clap(long, conflicts_with = "weights", required_unless_present = "weights")]
    target: Option<String>,

    /// JSON object mapping column names to weights
    #[clap(long)]
    weights: Option<String>,

    /// Minimum correlation for merging two columns' clusters
    #[clap(long, default_value_t = DEFAULT_CORRELATION_THRESHOLD)]
    threshold: f64,
}

#[derive(Args, Debug)]
struct LabelsArgs {
    /// Path to a text file with one label per line
    #[clap(long)]
    input: String,

    /// JSON object mapping labels to weights (default: label frequency)
    #[clap(long)]
    weights: Option<String>,

    /// Minimum similarity ratio (0-100) for merging two labels' clusters
    #[clap(long, default_value_t = DEFAULT_RATIO_THRESHOLD)]
    threshold: f64,
}

fn run_columns(args: &ColumnsArgs, parallel_min_items: usize) -> Result<(Clustering, String)> {
    let loaded = columns::load_numeric_columns(&args.input)?;

    let (features, weights) = match (&args.target, &args.weights) {
        (Some(target), _) => columns::roc_weights(loaded, target)?,
        (None, Some(path)) => (loaded, load_weights(path)?),
        (None, None) => return Err(anyhow!("Either --target or --weights is required")),
    };
    let features = columns::drop_constant_columns(features);

    let matrix = CorrelationMatrix::from_columns(&features);
    let config = Config {
        threshold: args.threshold,
        parallel_min_items,
        ..Config::default()
    };

    let clustering = cluster_items(matrix.names(), &weights, &matrix, &config)?;
    let rendered = report::render_report(&clustering, None, config.precision)?;

    Ok((clustering, rendered))
}

fn run_labels(args: &LabelsArgs, parallel_min_items: usize) -> Result<(Clustering, String)> {
    let label_set = labels::load_labels(&args.input)?;
    let weights: HashMap<String, f64> = match &args.weights {
        Some(path) => load_weights(path)?,
        None => label_set.frequencies.clone(),
    };

    let config = Config {
        threshold: args.threshold,
        parallel_min_items,
        ..Config::for_labels()
    };

    let clustering = cluster_items(&label_set.labels, &weights, &LabelRatio, &config)?;
    let similarity: &dyn Similarity = &LabelRatio;
    let rendered = report::render_report(&clustering, Some(similarity), config.precision)?;

    Ok((clustering, rendered))
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    // Set number of threads
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        // If threads = 0, use all available cores
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let (clustering, rendered) = match &args.command {
        Command::Columns(columns_args) => {
            log::info!("Clustering columns of {}", columns_args.input);
            run_columns(columns_args, args.parallel_min_items)?
        }
        Command::Labels(labels_args) => {
            log::info!("Clustering labels of {}", labels_args.input);
            run_labels(labels_args, args.parallel_min_items)?
        }
    };

    print!("{}", rendered);

    let summary = metrics::summarize(&clustering);
    log::info!(
        "{} items in {} clusters ({} singletons, largest {})",
        summary.item_count,
        summary.cluster_count,
        summary.singleton_count,
        summary.largest_cluster_size
    );

    if let Some(output_dir) = &args.output_dir {
        storage::save_results(&clustering, output_dir)?;
        log::info!("Results saved to {}", output_dir);
    }

    Ok(())
}
