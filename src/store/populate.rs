//! Initial population
//!
//! Uniform random values in a small range so that searches hit a useful
//! number of duplicates.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate `count` values drawn uniformly from `[0, value_range)`
///
/// Seeded runs are reproducible. A non-positive range yields an empty
/// population.
pub fn populate(count: usize, value_range: i32, seed: Option<u64>) -> Vec<i32> {
    if value_range <= 0 {
        return Vec::new();
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    (0..count).map(|_| rng.gen_range(0..value_range)).collect()
}
