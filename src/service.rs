//! Service Module
//!
//! Translates requests into locked operations on the shared sequence.
//!
//! ## Responsibilities
//! - Pick the lock mode for each request
//! - Apply a whole batch under a single hold
//! - Return copies of matched data, never live views

use std::collections::HashSet;

use crate::config::Config;
use crate::error::Result;
use crate::protocol::{Command, Reply};
use crate::store::{lock_for, populate, ParkingLotSequence, Record, Sequence, SequenceLock};

/// The request dispatcher
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Reads** (search/len): shared hold, run alongside other reads
/// - **Writes** (add/update/delete/relocate): exclusive hold, one batch at
///   a time; a batch is never observed half-applied
///
/// Each call takes its hold right before touching the sequence and drops it
/// before returning. Nothing is held across calls.
///
/// ## Batch failure policy
///
/// - `update` stops at the first out-of-range record. Records before it in
///   the same batch stay applied; there is no rollback.
/// - `delete` and `relocate` check every index against the pre-batch length
///   before removing anything, so a bad index leaves the sequence untouched.
///   This is stricter than `update`: a delete batch is all-or-nothing, while
///   an update batch keeps the records written before the failure.
pub struct Service {
    lock: Box<dyn SequenceLock>,
}

impl Service {
    /// Build the service described by `config`, generating its population
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        let values = populate(config.initial_records, config.value_range, config.seed);
        let lock = lock_for(config.lock_kind, Sequence::from_values(values));

        Ok(Self::with_lock(lock))
    }

    /// Wrap explicit values (parking_lot lock)
    pub fn with_values(values: Vec<i32>) -> Self {
        Self::with_lock(Box::new(ParkingLotSequence::new(Sequence::from_values(values))))
    }

    /// Wrap an already built lock
    pub fn with_lock(lock: Box<dyn SequenceLock>) -> Self {
        Self { lock }
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Reply> {
        match command {
            Command::Search { target } => Ok(Reply::Records(self.search(target)?)),
            Command::Add { values } => {
                self.add(&values)?;
                Ok(Reply::Ack)
            }
            Command::Update { records } => {
                self.update(&records)?;
                Ok(Reply::Ack)
            }
            Command::Delete { indexes } => {
                self.delete(&indexes)?;
                Ok(Reply::Ack)
            }
            Command::Relocate { indexes } => {
                self.relocate(&indexes)?;
                Ok(Reply::Ack)
            }
            Command::Len => Ok(Reply::Len(self.len()? as u64)),
            Command::Ping => Ok(Reply::Pong),
        }
    }

    /// All records whose value equals `target`, index-ascending
    ///
    /// An empty result is not an error.
    pub fn search(&self, target: i32) -> Result<Vec<Record>> {
        let sequence = self.lock.read()?;
        Ok(sequence.snapshot_matches(target))
    }

    /// Append `values` in order as one batch
    pub fn add(&self, values: &[i32]) -> Result<()> {
        let mut sequence = self.lock.write()?;
        for &value in values {
            sequence.append(value);
        }
        Ok(())
    }

    /// Overwrite each record's position with its value, in order
    ///
    /// Aborts at the first out-of-range index; earlier records stay applied.
    pub fn update(&self, records: &[Record]) -> Result<()> {
        let mut sequence = self.lock.write()?;
        for record in records {
            sequence.set_at(record.index, record.value)?;
        }
        Ok(())
    }

    /// Remove the values at `indexes`, all taken against the pre-batch state
    ///
    /// Removal runs in descending index order so no removal shifts a
    /// position still waiting in the batch. Repeated indexes are removed once.
    pub fn delete(&self, indexes: &[i64]) -> Result<()> {
        let mut sequence = self.lock.write()?;
        let positions = descending_positions(&sequence, indexes)?;
        for index in positions {
            sequence.remove_at(index)?;
        }
        Ok(())
    }

    /// Move the values at `indexes` to the end of the sequence
    ///
    /// Same as an Add of those values followed by a Delete of those indexes,
    /// but under one write hold so no other writer can shift positions in
    /// between. Values are appended in request order.
    pub fn relocate(&self, indexes: &[i64]) -> Result<()> {
        let mut sequence = self.lock.write()?;
        let positions = descending_positions(&sequence, indexes)?;

        let mut seen = HashSet::with_capacity(positions.len());
        let mut moved = Vec::with_capacity(positions.len());
        for &index in indexes {
            if seen.insert(index) {
                moved.push(sequence.get(index)?);
            }
        }

        for index in positions {
            sequence.remove_at(index)?;
        }
        for value in moved {
            sequence.append(value);
        }
        Ok(())
    }

    /// Current number of values
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock.read()?.is_empty())
    }

    /// Copy of the whole sequence
    pub fn snapshot(&self) -> Result<Vec<i32>> {
        Ok(self.lock.read()?.as_slice().to_vec())
    }

    /// Name of the lock in use
    pub fn description(&self) -> &'static str {
        self.lock.description()
    }
}

/// Validate every index, then order them highest first without repeats
fn descending_positions(sequence: &Sequence, indexes: &[i64]) -> Result<Vec<i64>> {
    for &index in indexes {
        sequence.position(index)?;
    }

    let mut positions = indexes.to_vec();
    positions.sort_unstable_by(|a, b| b.cmp(a));
    positions.dedup();
    Ok(positions)
}
