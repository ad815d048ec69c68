//! Lock strategies
//!
//! Single-writer/multi-reader exclusion around a `Sequence`, behind an
//! object-safe trait so the service does not care which lock it runs on.

use std::ops::{Deref, DerefMut};

use crate::config::LockKind;
use crate::error::{Result, StoreError};
use super::Sequence;

/// Shared hold on the sequence; released on drop
pub type ReadHold<'a> = Box<dyn Deref<Target = Sequence> + 'a>;

/// Exclusive hold on the sequence; released on drop
pub type WriteHold<'a> = Box<dyn DerefMut<Target = Sequence> + 'a>;

/// Reader-writer exclusion over the shared sequence
///
/// Any number of `read` holds may coexist. A `write` hold excludes every
/// other hold, read or write.
pub trait SequenceLock: Send + Sync {
    /// Acquire a shared hold, blocking behind an active writer
    fn read(&self) -> Result<ReadHold<'_>>;

    /// Acquire an exclusive hold, blocking behind every active holder
    fn write(&self) -> Result<WriteHold<'_>>;

    /// Name used in startup logs
    fn description(&self) -> &'static str;
}

/// Build the lock selected by `kind` around `sequence`
pub fn lock_for(kind: LockKind, sequence: Sequence) -> Box<dyn SequenceLock> {
    match kind {
        LockKind::ParkingLot => Box::new(ParkingLotSequence::new(sequence)),
        LockKind::Std => Box::new(StdSequence::new(sequence)),
    }
}

// =============================================================================
// parking_lot
// =============================================================================

/// Sequence guarded by `parking_lot::RwLock`
#[derive(Debug, Default)]
pub struct ParkingLotSequence {
    inner: parking_lot::RwLock<Sequence>,
}

impl ParkingLotSequence {
    pub fn new(sequence: Sequence) -> Self {
        Self {
            inner: parking_lot::RwLock::new(sequence),
        }
    }
}

impl SequenceLock for ParkingLotSequence {
    fn read(&self) -> Result<ReadHold<'_>> {
        Ok(Box::new(self.inner.read()))
    }

    fn write(&self) -> Result<WriteHold<'_>> {
        Ok(Box::new(self.inner.write()))
    }

    fn description(&self) -> &'static str {
        LockKind::ParkingLot.description()
    }
}

// =============================================================================
// std
// =============================================================================

/// Sequence guarded by `std::sync::RwLock`
#[derive(Debug, Default)]
pub struct StdSequence {
    inner: std::sync::RwLock<Sequence>,
}

impl StdSequence {
    pub fn new(sequence: Sequence) -> Self {
        Self {
            inner: std::sync::RwLock::new(sequence),
        }
    }
}

impl SequenceLock for StdSequence {
    fn read(&self) -> Result<ReadHold<'_>> {
        let guard = self
            .inner
            .read()
            .map_err(|e| StoreError::LockPoisoned(format!("Sequence read lock poisoned: {}", e)))?;
        Ok(Box::new(guard))
    }

    fn write(&self) -> Result<WriteHold<'_>> {
        let guard = self
            .inner
            .write()
            .map_err(|e| StoreError::LockPoisoned(format!("Sequence write lock poisoned: {}", e)))?;
        Ok(Box::new(guard))
    }

    fn description(&self) -> &'static str {
        LockKind::Std.description()
    }
}
