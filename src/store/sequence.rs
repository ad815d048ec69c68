//! Sequence implementation
//!
//! Plain `Vec<i32>` wrapper. Callers are responsible for holding the right
//! lock mode: `&self` methods under a read hold, `&mut self` under a write
//! hold.

use crate::error::{Result, StoreError};
use super::Record;

/// Ordered sequence of values addressed by position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    values: Vec<i32>,
}

impl Sequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing population
    pub fn from_values(values: Vec<i32>) -> Self {
        Self { values }
    }

    /// Collect every position holding `target`, index-ascending
    ///
    /// The result is a copy; later mutation of either side is not visible
    /// to the other.
    pub fn snapshot_matches(&self, target: i32) -> Vec<Record> {
        self.values
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value == target)
            .map(|(i, &value)| Record::new(i as i64, value))
            .collect()
    }

    /// Insert `value` at the end
    pub fn append(&mut self, value: i32) {
        self.values.push(value);
    }

    /// Overwrite the value at `index`
    pub fn set_at(&mut self, index: i64, value: i32) -> Result<()> {
        let pos = self.position(index)?;
        self.values[pos] = value;
        Ok(())
    }

    /// Remove the value at `index`, shifting later positions down by one
    ///
    /// Returns the removed value.
    pub fn remove_at(&mut self, index: i64) -> Result<i32> {
        let pos = self.position(index)?;
        Ok(self.values.remove(pos))
    }

    /// Read the value at `index`
    pub fn get(&self, index: i64) -> Result<i32> {
        let pos = self.position(index)?;
        Ok(self.values[pos])
    }

    /// Translate an external index into a checked position
    pub fn position(&self, index: i64) -> Result<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&pos| pos < self.values.len())
            .ok_or(StoreError::OutOfRange {
                index,
                len: self.values.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Borrow the raw values
    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }
}

impl From<Vec<i32>> for Sequence {
    fn from(values: Vec<i32>) -> Self {
        Self::from_values(values)
    }
}
