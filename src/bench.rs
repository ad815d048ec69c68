//! Load generator
//!
//! Drives a running server with read-then-write cycles from many threads and
//! records per-request latency.
//!
//! Every cycle searches for a random value, then issues one write chosen by
//! [`Method`]:
//! - `Add`: append one random value
//! - `Update`: overwrite every match with a new random value
//! - `Delete`: relocate every match to the end (add + delete in one call)

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, StoreError};
use crate::network::Client;
use crate::store::Record;

/// Write issued after each search
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    Add,
    Update,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Add => "add",
            Method::Update => "update",
            Method::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Latency bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyKind {
    Read,
    Write,
}

impl fmt::Display for LatencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LatencyKind::Read => f.write_str("read"),
            LatencyKind::Write => f.write_str("write"),
        }
    }
}

/// Aggregate latency for one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub kind: LatencyKind,
    pub count: usize,
    pub mean: Duration,
    pub p50: Duration,
    pub p99: Duration,
    pub max: Duration,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<5} count={} mean={:?} p50={:?} p99={:?} max={:?}",
            self.kind, self.count, self.mean, self.p50, self.p99, self.max
        )
    }
}

/// Thread-safe latency recorder
#[derive(Debug)]
pub struct LatencyLog {
    method: Method,
    samples: Mutex<Vec<(LatencyKind, Duration)>>,
}

impl LatencyLog {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            samples: Mutex::new(Vec::new()),
        }
    }

    /// Record one request and emit it as a structured event
    pub fn record(&self, kind: LatencyKind, elapsed: Duration) {
        tracing::info!(
            method = %self.method,
            kind = %kind,
            elapsed_us = elapsed.as_micros() as u64,
            "receive request"
        );
        self.samples.lock().push((kind, elapsed));
    }

    /// Number of samples of `kind`
    pub fn count(&self, kind: LatencyKind) -> usize {
        self.samples.lock().iter().filter(|(k, _)| *k == kind).count()
    }

    /// Summarize `kind`, or `None` if nothing was recorded
    ///
    /// Percentiles use the nearest-rank method.
    pub fn summarize(&self, kind: LatencyKind) -> Option<Summary> {
        let mut durations: Vec<Duration> = self
            .samples
            .lock()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|&(_, d)| d)
            .collect();

        if durations.is_empty() {
            return None;
        }
        durations.sort_unstable();

        let count = durations.len();
        let total: Duration = durations.iter().sum();

        Some(Summary {
            kind,
            count,
            mean: total / count as u32,
            p50: nearest_rank(&durations, 50),
            p99: nearest_rank(&durations, 99),
            max: durations[count - 1],
        })
    }
}

fn nearest_rank(sorted: &[Duration], percentile: usize) -> Duration {
    let rank = (percentile * sorted.len()).div_ceil(100).max(1);
    sorted[rank - 1]
}

/// Parameters shared by every benchmark thread
#[derive(Debug, Clone)]
pub struct Workload {
    /// Server address
    pub server: String,

    pub method: Method,

    /// Search targets and new values come from `[0, value_range)`
    pub value_range: i32,

    /// Cycles per thread
    pub cycle: usize,

    /// Base seed; thread `i` uses `seed + i`
    pub seed: Option<u64>,
}

/// Run `parallel` threads of `workload.cycle` cycles each
pub fn run(workload: &Workload, parallel: usize) -> Result<Arc<LatencyLog>> {
    if workload.value_range <= 0 {
        return Err(StoreError::Config(format!(
            "value_range must be positive, got {}",
            workload.value_range
        )));
    }

    let log = Arc::new(LatencyLog::new(workload.method));

    let handles: Vec<_> = (0..parallel)
        .map(|i| {
            let workload = workload.clone();
            let log = Arc::clone(&log);
            thread::spawn(move || -> Result<()> {
                let mut rng = match workload.seed {
                    Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(i as u64)),
                    None => StdRng::from_entropy(),
                };
                let mut client = Client::connect(workload.server.as_str())?;
                for _ in 0..workload.cycle {
                    run_cycle(&mut client, &workload, &mut rng, &log)?;
                }
                Ok(())
            })
        })
        .collect();

    let mut first_error = None;
    for handle in handles {
        let outcome = handle
            .join()
            .unwrap_or_else(|_| Err(StoreError::Network("benchmark thread panicked".to_string())));
        if let Err(e) = outcome {
            tracing::warn!("Benchmark thread failed: {}", e);
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(log),
    }
}

/// One search followed by one write
pub fn run_cycle<R: Rng>(
    client: &mut Client,
    workload: &Workload,
    rng: &mut R,
    log: &LatencyLog,
) -> Result<()> {
    let query = rng.gen_range(0..workload.value_range);
    let value = rng.gen_range(0..workload.value_range);

    let start = Instant::now();
    let records = client.search(query)?;
    log.record(LatencyKind::Read, start.elapsed());

    let start = Instant::now();
    match workload.method {
        Method::Add => client.add(vec![value])?,
        Method::Update => {
            let updates = records
                .iter()
                .map(|r| Record::new(r.index, value))
                .collect();
            client.update(updates)?;
        }
        Method::Delete => {
            let indexes = records.iter().map(|r| r.index).collect();
            client.relocate(indexes)?;
        }
    }
    log.record(LatencyKind::Write, start.elapsed());

    Ok(())
}
