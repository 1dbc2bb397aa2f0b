//! # Random Source
//!
//! The composer draws all of its randomness through [`RandomSource`], so
//! callers decide whether an encounter is reproducible (seeded `StdRng`),
//! thread-local (`rand::thread_rng()`) or fully scripted in tests.

use rand::Rng;

/// Source of the three kinds of draw the composer needs.
pub trait RandomSource {
    /// Uniform float in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize;

    /// Uniform integer in `[low, high]`. Returns `low` when the range is
    /// empty or a single value.
    fn next_in_range(&mut self, low: i64, high: i64) -> i64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }

    fn next_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }

    fn next_in_range(&mut self, low: i64, high: i64) -> i64 {
        if low >= high {
            low
        } else {
            self.gen_range(low..=high)
        }
    }
}

/// Picks an index with probability proportional to its weight.
///
/// Non-positive weights never win. If no weight is positive the pick is
/// uniform over all indices. Returns `None` only for an empty slice.
///
/// # Examples
///
/// ```
/// use encounter_forge::generation::random::weighted_index;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(1);
/// let weights = [0.0, 3.0, 0.0];
/// assert_eq!(weighted_index(&weights, &mut rng), Some(1));
/// assert_eq!(weighted_index(&[], &mut rng), None);
/// ```
pub fn weighted_index<R: RandomSource + ?Sized>(weights: &[f64], rng: &mut R) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }

    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 || !total.is_finite() {
        return Some(rng.next_index(weights.len()));
    }

    let roll = rng.next_unit() * total;
    let mut cumulative = 0.0;
    let mut last_positive = 0;
    for (index, &weight) in weights.iter().enumerate() {
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = index;
        if roll < cumulative {
            return Some(index);
        }
    }

    // Accumulated rounding can leave the roll just past the final bucket
    Some(last_positive)
}
