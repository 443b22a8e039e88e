//! Bounded FIFO of recent observations.

use std::collections::VecDeque;

use super::Price;

/// Capacity of the rolling window.
pub const HISTORY_CAPACITY: usize = 30;

/// The most recent observations, oldest first, FIFO-evicted at capacity.
///
/// Kept for external inspection only; pivot and change logic never read it.
#[derive(Debug, Clone, Default)]
pub struct RollingHistory {
    entries: VecDeque<Price>,
}

impl RollingHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted list, keeping only the newest
    /// [`HISTORY_CAPACITY`] entries.
    #[must_use]
    pub fn from_entries(entries: Vec<Price>) -> Self {
        let skip = entries.len().saturating_sub(HISTORY_CAPACITY);
        Self {
            entries: entries.into_iter().skip(skip).collect(),
        }
    }

    /// Append an observation, evicting the oldest at capacity.
    pub fn push(&mut self, price: Price) {
        if self.entries.len() == HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(price);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest-first copy, the shape the store persists.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Price> {
        self.entries.iter().copied().collect()
    }
}
