use std::fs;
use std::path::PathBuf;

use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use mhg_graph::{
    output,
    partition_alignment_graph,
};
use tracing::info;

/// Group pairwise sequence alignments from a directory of BLAST XML reports
/// into homology modules.
#[derive(Parser, Debug)]
#[command(name = "mhg-cli")]
#[command(about = "Partition BLAST alignments into homology modules")]
struct Args {
    /// Directory of BLAST XML reports to read.
    #[arg(short, long)]
    query: PathBuf,

    /// Path to write the resulting module listing to.
    #[arg(short, long)]
    output: PathBuf,

    /// Relative bitscore threshold applied before partitioning.
    #[arg(short, long, default_value_t = mhg_io::DEFAULT_THRESHOLD)]
    threshold: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let graph = mhg_io::load_alignment_graph(&args.query, args.threshold)
        .with_context(|| format!("loading alignment reports from {}", args.query.display()))?;
    info!(
        alignments = graph.alignments().len(),
        "built alignment graph"
    );

    let modules = partition_alignment_graph(&graph);
    info!(modules = modules.len(), "partitioning complete");

    let rendered = output::format_modules(&modules);
    fs::write(&args.output, rendered)
        .with_context(|| format!("writing modules to {}", args.output.display()))?;

    Ok(())
}
