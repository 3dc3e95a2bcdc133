//! Trace-driven predictor simulator CLI.
//!
//! This binary replays event traces through the models of `predsim-core`. It provides:
//! 1. **Branch mode:** Runs a direction predictor over the branch events and writes its accuracy report.
//! 2. **Cache mode:** Runs a cache and prefetcher over the loads and stores, appending checkpoint reports.
//!
//! Flags override values from an optional JSON configuration file. Log
//! verbosity comes from `RUST_LOG` (default `warn`).

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use predsim_core::common::{ConfigError, TraceError};
use predsim_core::config::{BranchPredictorKind, Config, PrefetcherKind};
use predsim_core::sim::Step;
use predsim_core::sim::trace::TraceReader;
use predsim_core::stats::{BranchReport, MemoryReport, Ratio};
use predsim_core::{BranchSimulation, MemorySimulation};

#[derive(Parser, Debug)]
#[command(
    name = "predsim",
    author,
    version,
    about = "Trace-driven branch predictor and cache prefetcher simulator",
    long_about = "Replay an event trace through a branch predictor or a cache with a hardware prefetcher.\n\nTrace lines: `B <pc> <0|1>`, `I [count]`, `L <addr> <pc>`, `S <addr> <pc>`.\n\nExamples:\n  predsim branch --trace gcc.trace --bp-type tournament --num-bp-entries 4096\n  predsim cache --trace mcf.trace --pref-type stride --aggr 4 -a 4 -o stride.out"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate a branch direction predictor.
    Branch(BranchArgs),

    /// Simulate a set-associative cache with a hardware prefetcher.
    Cache(CacheArgs),
}

#[derive(Args, Debug, Default)]
struct BranchArgs {
    /// Event trace to replay.
    #[arg(short, long)]
    trace: PathBuf,

    /// Predictor: always_taken, local, gshare or tournament.
    #[arg(long = "bp-type")]
    bp_type: Option<BranchPredictorKind>,

    /// Entries in each pattern history table.
    #[arg(long = "num-bp-entries")]
    num_bp_entries: Option<u64>,

    /// Report file.
    #[arg(short, long, default_value = "BP_stats.out")]
    output: PathBuf,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl BranchArgs {
    /// Loads the configuration file and applies the flags on top of it.
    fn resolve(&self) -> Result<Config, CliError> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(kind) = self.bp_type {
            config.branch.predictor = kind;
        }
        if let Some(entries) = self.num_bp_entries {
            config.branch.entries = entries;
        }
        Ok(config)
    }

    fn run(&self) -> Result<(), CliError> {
        let config = self.resolve()?;
        let report = cmd_branch(&config, &self.trace, &self.output)?;
        println!("{}", Ratio(report.0.accuracy()));
        Ok(())
    }
}

#[derive(Args, Debug, Default)]
struct CacheArgs {
    /// Event trace to replay.
    #[arg(short, long)]
    trace: PathBuf,

    /// Prefetcher: none, next_n_lines, stride or distance.
    #[arg(long = "pref-type")]
    pref_type: Option<PrefetcherKind>,

    /// Blocks (or distances) prefetched per trigger.
    #[arg(long)]
    aggr: Option<usize>,

    /// Number of cache sets.
    #[arg(long)]
    sets: Option<usize>,

    /// Cache block size in bytes.
    #[arg(short = 'b', long = "block-bytes")]
    block_bytes: Option<usize>,

    /// Cache associativity (1 for direct mapped).
    #[arg(short = 'a', long = "assoc")]
    assoc: Option<usize>,

    /// Seed for RPT random replacement.
    #[arg(long)]
    seed: Option<u64>,

    /// Report file; checkpoints are written as they are reached.
    #[arg(short, long, default_value = "data")]
    output: PathBuf,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl CacheArgs {
    /// Loads the configuration file and applies the flags on top of it.
    fn resolve(&self) -> Result<Config, CliError> {
        let mut config = load_config(self.config.as_deref())?;
        let cache = &mut config.cache;
        if let Some(kind) = self.pref_type {
            cache.prefetcher = kind;
        }
        if let Some(v) = self.aggr {
            cache.aggression = v;
        }
        if let Some(v) = self.sets {
            cache.sets = v;
        }
        if let Some(v) = self.block_bytes {
            cache.block_bytes = v;
        }
        if let Some(v) = self.assoc {
            cache.ways = v;
        }
        if let Some(v) = self.seed {
            cache.seed = v;
        }
        Ok(config)
    }

    fn run(&self) -> Result<(), CliError> {
        let config = self.resolve()?;
        let report = cmd_cache(&config, &self.trace, &self.output)?;
        println!("{}", Ratio(report.0.hit_rate()));
        Ok(())
    }
}

/// Failures reported to the user before exiting with status 1.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{path}: {source}")]
    Trace { path: PathBuf, source: TraceError },

    #[error("{path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl CliError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn trace(path: &Path) -> impl FnOnce(TraceError) -> Self + '_ {
        move |source| Self::Trace {
            path: path.to_path_buf(),
            source,
        }
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Branch(args) => args.run(),
        Commands::Cache(args) => args.run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Reads `path` as a JSON configuration, or returns the defaults.
///
/// The file is not validated here: flags may still override it, and each
/// simulation checks only the sections it uses.
fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(CliError::io(path))?;
            Ok(Config::parse(&text)?)
        }
        None => Ok(Config::default()),
    }
}

/// Replays `trace` through a branch predictor and writes the final report.
fn cmd_branch(config: &Config, trace: &Path, output: &Path) -> Result<BranchReport, CliError> {
    let mut sim = BranchSimulation::new(config)?;
    tracing::info!(
        predictor = %config.branch.predictor,
        entries = config.branch.entries,
        trace = %trace.display(),
        "branch simulation started"
    );

    for event in TraceReader::open(trace).map_err(CliError::trace(trace))? {
        let event = event.map_err(CliError::trace(trace))?;
        if sim.on_event(event).is_stop() {
            break;
        }
    }

    let report = sim.report();
    fs::write(output, report.to_string()).map_err(CliError::io(output))?;
    Ok(report)
}

/// Replays `trace` through a cache and prefetcher, writing each checkpoint
/// to `output`, then a completion line and the final report.
fn cmd_cache(config: &Config, trace: &Path, output: &Path) -> Result<MemoryReport, CliError> {
    let mut sim = MemorySimulation::new(config)?;
    tracing::info!(
        prefetcher = %config.cache.prefetcher,
        sets = config.cache.sets,
        ways = config.cache.ways,
        block_bytes = config.cache.block_bytes,
        aggression = config.cache.aggression,
        trace = %trace.display(),
        "cache simulation started"
    );

    let file = File::create(output).map_err(CliError::io(output))?;
    let mut out = BufWriter::new(file);

    for event in TraceReader::open(trace).map_err(CliError::trace(trace))? {
        let event = event.map_err(CliError::trace(trace))?;
        match sim.on_event(event) {
            Step::Continue => {}
            Step::Checkpoint(report) => {
                write!(out, "{report}").map_err(CliError::io(output))?;
            }
            Step::Stop(_) => break,
        }
    }

    let report = sim.report();
    writeln!(out, "The program has completed execution").map_err(CliError::io(output))?;
    write!(out, "{report}").map_err(CliError::io(output))?;
    out.flush().map_err(CliError::io(output))?;
    Ok(report)
}
