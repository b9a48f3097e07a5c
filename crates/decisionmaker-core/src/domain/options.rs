//! Option store domain entity.
//!
//! An [`OptionStore`] is the ordered list of [`WeightedOption`]s the user is
//! currently editing.  Each option is a `(label, weight)` pair where the
//! weight is a positive integer: an option with weight 3 is three times as
//! likely to be picked as an option with weight 1.
//!
//! Labels do not have to be unique.  Two options called "pizza" are simply
//! two independent entries, each contributing its own weight.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weight used when the user does not specify one.
pub const DEFAULT_WEIGHT: u32 = 1;

/// Errors raised when constructing a single option.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionError {
    /// The label is empty after trimming whitespace.
    #[error("option label must not be empty")]
    EmptyLabel,

    /// Weights must be at least 1.
    #[error("option weight must be at least 1")]
    ZeroWeight,
}

/// Errors raised by [`OptionStore`] mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// An index does not refer to an option in the store.
    #[error("option index {index} is out of range (list has {len} options)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The new option (or new weight) is invalid.
    #[error(transparent)]
    Option(#[from] OptionError),
}

/// A single choice and its relative selection weight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeightedOption {
    label: String,
    weight: u32,
}

impl WeightedOption {
    /// Creates an option, rejecting empty labels and zero weights.
    ///
    /// The label is stored as given; trimming is the caller's concern
    /// ([`OptionStore::add`] trims).
    pub fn new(label: impl Into<String>, weight: u32) -> Result<Self, OptionError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(OptionError::EmptyLabel);
        }
        if weight == 0 {
            return Err(OptionError::ZeroWeight);
        }
        Ok(Self { label, weight })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

impl fmt::Display for WeightedOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (Weight: {})", self.label, self.weight)
    }
}

/// How the option list is ordered for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending by label (case-sensitive, ordinal).  Equal labels are
    /// ordered by weight, heaviest first.
    #[default]
    #[serde(alias = "alphabetical")]
    Alphabetical,
    /// Descending by weight.  Equal weights are ordered by label.
    #[serde(alias = "weight")]
    Weight,
}

impl SortOrder {
    /// Total ordering over `(label, weight)` for this sort order.
    pub fn compare(self, a: &WeightedOption, b: &WeightedOption) -> Ordering {
        match self {
            SortOrder::Alphabetical => a
                .label
                .cmp(&b.label)
                .then_with(|| b.weight.cmp(&a.weight)),
            SortOrder::Weight => b
                .weight
                .cmp(&a.weight)
                .then_with(|| a.label.cmp(&b.label)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Alphabetical => f.write_str("Alphabetical"),
            SortOrder::Weight => f.write_str("Weight"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alphabetical" | "alpha" | "a" => Ok(SortOrder::Alphabetical),
            "weight" | "w" => Ok(SortOrder::Weight),
            other => Err(format!(
                "unknown sort order '{other}' (expected 'alphabetical' or 'weight')"
            )),
        }
    }
}

/// The ordered, editable collection of options.
///
/// Indices are positions in the current order; they stay valid until the
/// next `add`, `remove` or `sort`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionStore {
    options: Vec<WeightedOption>,
}

impl OptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an already-validated list of options, keeping their order.
    pub fn from_options(options: Vec<WeightedOption>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[WeightedOption] {
        &self.options
    }

    pub fn into_options(self) -> Vec<WeightedOption> {
        self.options
    }

    pub fn get(&self, index: usize) -> Option<&WeightedOption> {
        self.options.get(index)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Appends one option per comma-separated label in `text`, all sharing
    /// `weight`.
    ///
    /// Labels are trimmed and empty labels are skipped, so `"a, ,b,"` adds
    /// two options.  Returns the number of options appended.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::ZeroWeight`] (wrapped) if `weight` is 0; the
    /// store is left unchanged.
    pub fn add(&mut self, text: &str, weight: u32) -> Result<usize, StoreError> {
        if weight == 0 {
            return Err(OptionError::ZeroWeight.into());
        }

        let before = self.options.len();
        for label in text.split(',').map(str::trim).filter(|l| !l.is_empty()) {
            self.options.push(WeightedOption {
                label: label.to_string(),
                weight,
            });
        }
        Ok(self.options.len() - before)
    }

    /// Appends a single, already-constructed option.
    pub fn push(&mut self, option: WeightedOption) {
        self.options.push(option);
    }

    /// Replaces the weight of the option at `index`.
    ///
    /// # Errors
    ///
    /// [`StoreError::IndexOutOfRange`] for a bad index, or a wrapped
    /// [`OptionError::ZeroWeight`] for a zero weight.
    pub fn edit(&mut self, index: usize, new_weight: u32) -> Result<(), StoreError> {
        if new_weight == 0 {
            return Err(OptionError::ZeroWeight.into());
        }
        let len = self.options.len();
        let option = self
            .options
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })?;
        option.weight = new_weight;
        Ok(())
    }

    /// Removes every option whose index is in `indices`.
    ///
    /// Duplicate indices are collapsed.  All indices are checked before
    /// anything is removed, then removal runs from the highest index down so
    /// earlier removals never shift later ones.  Returns the removed options
    /// in their original relative order.
    ///
    /// # Errors
    ///
    /// [`StoreError::IndexOutOfRange`] (reporting the largest bad index) if
    /// any index is invalid; the store is left unchanged.
    pub fn remove(&mut self, indices: &[usize]) -> Result<Vec<WeightedOption>, StoreError> {
        let unique: BTreeSet<usize> = indices.iter().copied().collect();
        let len = self.options.len();

        if let Some(&index) = unique.iter().next_back() {
            if index >= len {
                return Err(StoreError::IndexOutOfRange { index, len });
            }
        }

        let mut removed: Vec<WeightedOption> = unique
            .iter()
            .rev()
            .map(|&index| self.options.remove(index))
            .collect();
        removed.reverse();
        Ok(removed)
    }

    /// Sorts the store in place.  See [`SortOrder`] for the exact orderings.
    pub fn sort(&mut self, order: SortOrder) {
        self.options.sort_by(|a, b| order.compare(a, b));
    }

    /// Removes all options ("new list").
    pub fn clear(&mut self) {
        self.options.clear();
    }

    /// Sum of all weights, computed without overflow.
    pub fn total_weight(&self) -> u64 {
        self.options.iter().map(|o| u64::from(o.weight)).sum()
    }
}

impl From<Vec<WeightedOption>> for OptionStore {
    fn from(options: Vec<WeightedOption>) -> Self {
        Self::from_options(options)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
