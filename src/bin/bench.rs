//! RecStore Benchmark Client
//!
//! Runs read-then-write cycles against a server from parallel threads and
//! logs every request latency.

use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use recstore::bench::{self, LatencyKind, Method, Workload};
use tracing_subscriber::{fmt, EnvFilter};

/// RecStore load generator
#[derive(Parser, Debug)]
#[command(name = "recstore-bench")]
#[command(about = "Measure search/write latency against a RecStore server")]
struct Args {
    /// Experiment name (results file prefix)
    #[arg(short, long)]
    name: String,

    /// Write issued after each search
    #[arg(short, long, value_enum)]
    method: Method,

    /// Number of parallel client threads
    #[arg(short, long, default_value = "1")]
    parallel: usize,

    /// Cycles per thread
    #[arg(short, long, default_value = "100")]
    cycle: usize,

    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:50051")]
    server: String,

    /// Search targets and new values fall in [0, VALUE_RANGE)
    #[arg(short, long, default_value = "100000")]
    value_range: i32,

    /// Base RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write JSON latency events to RESULTS_DIR/NAME_PARALLEL instead of stderr
    #[arg(short, long)]
    results_dir: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("error: failed to open results file: {}", e);
        std::process::exit(1);
    }

    let workload = Workload {
        server: args.server.clone(),
        method: args.method,
        value_range: args.value_range,
        cycle: args.cycle,
        seed: args.seed,
    };

    let log = match bench::run(&workload, args.parallel) {
        Ok(log) => log,
        Err(e) => {
            eprintln!("error: benchmark failed: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "{} method={} parallel={} cycle={}",
        args.name, args.method, args.parallel, args.cycle
    );
    for kind in [LatencyKind::Read, LatencyKind::Write] {
        if let Some(summary) = log.summarize(kind) {
            println!("{}", summary);
        }
    }
}

fn init_logging(args: &Args) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match &args.results_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let path = dir.join(format!("{}_{}", args.name, args.parallel));
            let file = File::create(path)?;
            fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}
