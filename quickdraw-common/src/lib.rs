//! Common types and utilities shared across Quickdraw crates.
//!
//! This crate defines the sample domain types, observability helpers, and
//! shared error types used throughout the Quickdraw workspace. It is
//! intentionally lightweight so that all crates can depend on it without
//! introducing heavy transitive costs.
//!
//! # Overview
//!
//! - [`Sample`] and [`SampleSet`]: one harvested quick-tip pick and the
//!   append-only table of picks a run accumulates
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`QuickdrawError`] and [`Result`]: shared error handling
//! - [`StealthLevel`]: how aggressively the browser session hides automation
//!
//! # Examples
//!
//! ```rust
//! use quickdraw_common::{Sample, SampleSet};
//!
//! let mut set = SampleSet::default();
//! set.push(Sample::new(vec![3, 11, 19, 24, 38, 45]));
//! assert_eq!(set.len(), 1);
//! assert!(set.samples()[0].is_complete());
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// Number of pick slots on the lottery field, and the column count of every
/// persisted sample table.
pub const PICK_SLOTS: usize = 6;

/// One quick-tip draw: the numbers the page marked as active, in display
/// order. A glitched collection may carry fewer than [`PICK_SLOTS`] numbers;
/// a sample is never modified once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample(Vec<u8>);

impl Sample {
    /// Record a draw from the marked numbers, in the order the page lists
    /// them.
    pub fn new(numbers: Vec<u8>) -> Self {
        Self(numbers)
    }

    /// The marked numbers.
    pub fn numbers(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the draw filled every pick slot.
    pub fn is_complete(&self) -> bool {
        self.0.len() == PICK_SLOTS
    }
}

impl From<Vec<u8>> for Sample {
    fn from(numbers: Vec<u8>) -> Self {
        Self::new(numbers)
    }
}

/// Append-only collection of [`Sample`]s gathered during one or more runs.
///
/// Equivalent to a table with [`PICK_SLOTS`] positional columns. Samples are
/// only ever appended; existing rows are never rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSet(Vec<Sample>);

impl SampleSet {
    pub fn push(&mut self, sample: Sample) {
        self.0.push(sample);
    }

    /// Append every sample of `other`, preserving its order.
    pub fn extend(&mut self, other: SampleSet) {
        self.0.extend(other.0);
    }

    pub fn samples(&self) -> &[Sample] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Sample> for SampleSet {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for SampleSet {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Browser automation stealth level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StealthLevel {
    Lightweight,
    Balanced,
    Maximum,
}

impl Default for StealthLevel {
    fn default() -> Self {
        Self::Balanced
    }
}

/// Error types used across the Quickdraw system.
#[derive(thiserror::Error, Debug)]
pub enum QuickdrawError {
    /// The browser driver or page reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persisting or loading samples failed.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Convenient alias for results that use [`QuickdrawError`].
pub type Result<T> = std::result::Result<T, QuickdrawError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_completeness() {
        let full = Sample::new(vec![1, 2, 3, 4, 5, 6]);
        assert!(full.is_complete());

        let short = Sample::new(vec![7, 12]);
        assert!(!short.is_complete());
        assert_eq!(short.len(), 2);
    }

    #[test]
    fn sample_set_appends_in_order() {
        let mut set = SampleSet::default();
        set.push(Sample::new(vec![1, 2, 3, 4, 5, 6]));

        let mut tail = SampleSet::default();
        tail.push(Sample::new(vec![7, 8, 9, 10, 11, 12]));
        set.extend(tail);

        assert_eq!(set.len(), 2);
        assert_eq!(set.samples()[1].numbers(), &[7, 8, 9, 10, 11, 12]);
    }
}
