//! Persistence port.

use async_trait::async_trait;

use crate::domain::{DailyRecordMap, Price};
use crate::error::StoreError;

/// Persistence of the daily aggregate map and the rolling price history.
///
/// `save` must be atomic from the caller's perspective: after a crash
/// mid-write the previous snapshot is still intact. A failed save is
/// non-fatal; in-memory state stays authoritative.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the persisted snapshot. Absent files yield empty state.
    async fn load(&self) -> Result<(DailyRecordMap, Vec<Price>), StoreError>;

    /// Persist the current snapshot, replacing the previous one.
    async fn save(&self, daily: &DailyRecordMap, history: &[Price]) -> Result<(), StoreError>;
}
