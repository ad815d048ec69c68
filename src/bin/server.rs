//! RecStore Server Binary
//!
//! Generates the initial population and starts the TCP server.

use std::sync::Arc;

use clap::Parser;
use recstore::network::Server;
use recstore::{Config, LockKind, Service};
use tracing_subscriber::{fmt, EnvFilter};

/// RecStore Server
#[derive(Parser, Debug)]
#[command(name = "recstore-server")]
#[command(about = "In-memory record store with single-writer/multi-reader locking")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:50051")]
    listen: String,

    /// Number of connection worker threads
    #[arg(short = 'p', long, default_value = "16")]
    workers: usize,

    /// Maximum accepted connections waiting for a worker
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Number of values generated at startup
    #[arg(short = 'n', long, default_value = "1000000")]
    records: usize,

    /// Generated values fall in [0, VALUE_RANGE) (defaults to records / 10)
    #[arg(short, long)]
    value_range: Option<i32>,

    /// RNG seed for a reproducible population
    #[arg(short, long)]
    seed: Option<u64>,

    /// Reader-writer lock implementation
    #[arg(long, value_enum, default_value_t = LockKind::ParkingLot)]
    lock: LockKind,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,recstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("RecStore Server v{}", recstore::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    let mut builder = Config::builder()
        .listen_addr(&args.listen)
        .workers(args.workers)
        .max_connections(args.max_connections)
        .initial_records(args.records)
        .seed(args.seed)
        .lock_kind(args.lock);
    if let Some(range) = args.value_range {
        builder = builder.value_range(range);
    }
    let config = builder.build();

    tracing::info!(
        "Generating {} records in [0, {}) with {}",
        config.initial_records,
        config.value_range,
        config.lock_kind.description()
    );

    let service = match Service::open(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to build store: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Store initialized successfully");

    let server = match Server::bind(config, service) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
