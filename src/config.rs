//! Configuration for RecStore
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, StoreError};

/// Main configuration for a RecStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Number of values generated at startup
    pub initial_records: usize,

    /// Generated values are drawn from `[0, value_range)`
    ///
    /// Defaults to a tenth of `initial_records` (at least 1).
    pub value_range: i32,

    /// Fixed RNG seed for a reproducible population (entropy when `None`)
    pub seed: Option<u64>,

    /// Reader-writer lock implementation guarding the sequence
    pub lock_kind: LockKind,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of connection worker threads
    pub workers: usize,

    /// Max accepted connections waiting for a free worker
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,
}

/// Which reader-writer lock backs the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LockKind {
    /// `parking_lot::RwLock` (writer-fair, never poisoned)
    #[default]
    ParkingLot,

    /// `std::sync::RwLock` (poisoning surfaces as `LockPoisoned`)
    Std,
}

impl LockKind {
    /// Human readable name used in startup logs
    pub fn description(&self) -> &'static str {
        match self {
            LockKind::ParkingLot => "parking_lot::RwLock",
            LockKind::Std => "std::sync::RwLock",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let initial_records = 1_000_000;
        Self {
            initial_records,
            value_range: Config::default_value_range(initial_records),
            seed: None,
            lock_kind: LockKind::ParkingLot,
            listen_addr: "127.0.0.1:50051".to_string(),
            workers: 16,
            max_connections: 1024,
            read_timeout_ms: 0,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Value range used when none is given: `records / 10`, never below 1
    pub fn default_value_range(records: usize) -> i32 {
        i32::try_from(records / 10).unwrap_or(i32::MAX).max(1)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(StoreError::Config(
                "worker pool needs at least one thread".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(StoreError::Config(
                "max_connections must be positive".to_string(),
            ));
        }
        if self.initial_records > 0 && self.value_range <= 0 {
            return Err(StoreError::Config(format!(
                "value_range must be positive to generate {} records, got {}",
                self.initial_records, self.value_range
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
    value_range: Option<i32>,
}

impl ConfigBuilder {
    /// Set the number of values generated at startup
    pub fn initial_records(mut self, count: usize) -> Self {
        self.config.initial_records = count;
        self
    }

    /// Set the exclusive upper bound of generated values
    pub fn value_range(mut self, range: i32) -> Self {
        self.value_range = Some(range);
        self
    }

    /// Fix the RNG seed
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the lock implementation
    pub fn lock_kind(mut self, kind: LockKind) -> Self {
        self.config.lock_kind = kind;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the worker pool size
    pub fn workers(mut self, count: usize) -> Self {
        self.config.workers = count;
        self
    }

    /// Set the maximum number of queued connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(mut self) -> Config {
        self.config.value_range = self
            .value_range
            .unwrap_or_else(|| Config::default_value_range(self.config.initial_records));
        self.config
    }
}
