//! Store Module
//!
//! The shared, ordered, mutable sequence of integer values.
//!
//! ## Responsibilities
//! - Hold the authoritative sequence
//! - Enumerate matches for a value in index order
//! - Append, overwrite and remove by position
//! - Guarantee single-writer/multi-reader access through a `SequenceLock`
//!
//! ## Addressing
//! A record's `index` is its position at the time it was read. It is not a
//! stable identifier: any append, removal or relocation that runs between a
//! search and a later write can move values around, and a write using the
//! stale index then lands on whatever now occupies that position. Nothing
//! here detects that.

mod sequence;
mod lock;
mod populate;

use serde::{Deserialize, Serialize};

pub use sequence::Sequence;
pub use lock::{lock_for, ParkingLotSequence, ReadHold, SequenceLock, StdSequence, WriteHold};
pub use populate::populate;

/// A value together with the position it was observed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Position in the sequence when the record was read
    pub index: i64,

    /// The stored value
    pub value: i32,
}

impl Record {
    pub fn new(index: i64, value: i32) -> Self {
        Self { index, value }
    }
}
