//! # Measurements Aggregator
//!
//! Command-line front end: aggregates a measurements file and prints
//! `{station=min/mean/max, ...}` to stdout.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use measurements_core::logging::init_structured_logging;
use measurements_core::{
    format_aggregate, ConfigLoader, ConfigOverrides, InputSource, MergeStrategy,
    PipelineCoordinator,
};
use tracing::error;

#[derive(Parser)]
#[command(name = "measurements")]
#[command(about = "Compute per-station min/mean/max over a measurements file")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Input file with one `<station>;<value>` record per line (`-` for stdin)
    input: PathBuf,

    /// Configuration file (toml, yaml or json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of aggregation workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Lines per batch
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Capacity of the batch queue
    #[arg(short, long)]
    queue_depth: Option<usize>,

    /// Global merge strategy (sharded or locked)
    #[arg(long)]
    merge_strategy: Option<MergeStrategy>,

    /// Print the run report as JSON to stderr
    #[arg(long)]
    json_report: bool,
}

fn main() {
    init_structured_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => process::exit(0),
        Err(e) => {
            error!("Aggregation failed: {:#}", e);
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            worker_count: self.workers,
            batch_size: self.batch_size,
            queue_depth: self.queue_depth,
            merge_strategy: self.merge_strategy,
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut loader = ConfigLoader::new().with_overrides(cli.overrides());
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let config = loader.load().context("loading configuration")?;

    let source = if cli.input.as_os_str() == "-" {
        InputSource::reader("stdin", std::io::stdin())
    } else {
        InputSource::path(&cli.input)
    };

    let coordinator = PipelineCoordinator::new(config)?;
    let outcome = coordinator.run(source)?;

    println!("{}", format_aggregate(&outcome.aggregate));

    if let Some(warning) = &outcome.warning {
        eprintln!("warning: {warning}; result is partial");
    }

    if cli.json_report {
        eprintln!("{}", serde_json::to_string_pretty(&outcome.report)?);
    }

    Ok(())
}
