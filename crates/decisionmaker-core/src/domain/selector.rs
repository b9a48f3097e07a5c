//! Weighted random selection.
//!
//! # How the draw works (for beginners)
//!
//! Picture the options laid end to end on a ruler, each one taking up as many
//! units as its weight:
//!
//! ```text
//! pizza (1)  tacos (3)
//! [0]        [1 2 3]
//! ```
//!
//! Drawing a uniformly random integer in `0..total` and finding which segment
//! it falls into gives each option a probability of `weight / total`.
//!
//! The selector precomputes the running (cumulative) totals `[1, 4]` once, so
//! each draw is a binary search: O(log n) regardless of how large the weights
//! are.  Expanding every option into `weight` copies would cost O(total
//! weight) memory and time and degrade badly for large weights.

use rand::Rng;
use thiserror::Error;

use super::options::WeightedOption;

/// Errors raised by the selector.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    /// There is nothing to choose from.
    #[error("no options to choose from")]
    Empty,
}

/// A prepared weighted sampler over a borrowed slice of options.
#[derive(Debug, Clone)]
pub struct WeightedSelector<'a> {
    options: &'a [WeightedOption],
    /// `cumulative[i]` is the sum of weights `0..=i`.
    cumulative: Vec<u64>,
}

impl<'a> WeightedSelector<'a> {
    /// Builds the cumulative weight table.
    ///
    /// # Errors
    ///
    /// Returns [`SelectError::Empty`] when `options` is empty.
    pub fn new(options: &'a [WeightedOption]) -> Result<Self, SelectError> {
        if options.is_empty() {
            return Err(SelectError::Empty);
        }

        let cumulative = options
            .iter()
            .scan(0u64, |acc, option| {
                *acc += u64::from(option.weight());
                Some(*acc)
            })
            .collect();

        Ok(Self {
            options,
            cumulative,
        })
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> u64 {
        // `new` guarantees at least one entry.
        self.cumulative.last().copied().unwrap_or(0)
    }

    /// Probability that the option at `index` is drawn, or `None` for an
    /// invalid index.
    pub fn probability(&self, index: usize) -> Option<f64> {
        let option = self.options.get(index)?;
        Some(f64::from(option.weight()) / self.total_weight() as f64)
    }

    /// Draws the index of one option.
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let ticket = rng.gen_range(0..self.total_weight());
        // First position whose running total exceeds the ticket.
        self.cumulative.partition_point(|&acc| acc <= ticket)
    }

    /// Draws one option.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &'a WeightedOption {
        &self.options[self.sample_index(rng)]
    }
}

/// One-shot weighted pick.
///
/// # Errors
///
/// Returns [`SelectError::Empty`] when `options` is empty.
pub fn pick<'a, R: Rng + ?Sized>(
    options: &'a [WeightedOption],
    rng: &mut R,
) -> Result<&'a WeightedOption, SelectError> {
    Ok(WeightedSelector::new(options)?.sample(rng))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
