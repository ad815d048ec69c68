//! # RecStore
//!
//! An in-memory record store served over TCP:
//! - Value search returning (index, value) records
//! - Batched append, in-place update, and delete by position
//! - Single-writer/multi-reader concurrency model
//! - Load generator for read/write latency experiments
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │           (acceptor + bounded worker pool)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Service                                │
//! │        (one lock hold per request, batch at a time)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │ SequenceLock  │
//!               │   (RwLock)    │
//!               └───────┬───────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │   Sequence    │
//!               │  (Vec<i32>)   │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod protocol;
pub mod service;
pub mod network;
pub mod bench;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, LockKind};
pub use service::Service;
pub use store::Record;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of RecStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
