//! Shared market state.
//!
//! Everything the two execution contexts (timer loop, inbound commands)
//! mutate lives in this one value, owned by the orchestrator behind a
//! single lock. No component outside [`crate::app`] holds a reference.

use std::collections::HashSet;

use crate::domain::{
    pivot, today_key, update_daily, ChatId, DailyRecord, DailyRecordMap, PivotLevels, Price,
    RollingHistory,
};

/// The orchestrator-owned mutable state.
#[derive(Debug, Default)]
pub struct MarketState {
    daily: DailyRecordMap,
    history: RollingHistory,
    /// Price at the last automatic notification (or the first ever seen).
    /// Distinct from the most recent raw observation.
    baseline: Option<Price>,
    /// Append-only for the process lifetime; there is no unsubscribe.
    subscribers: HashSet<ChatId>,
}

impl MarketState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a persisted snapshot.
    #[must_use]
    pub fn from_snapshot(daily: DailyRecordMap, history: Vec<Price>) -> Self {
        Self {
            daily,
            history: RollingHistory::from_entries(history),
            baseline: None,
            subscribers: HashSet::new(),
        }
    }

    /// Fold one observation into today's record and the rolling history.
    pub fn observe(&mut self, date: &str, price: Price) -> DailyRecord {
        let record = update_daily(&mut self.daily, date, price);
        self.history.push(price);
        record
    }

    /// Pivot levels for `date`, if a record exists.
    #[must_use]
    pub fn pivot_levels(&self, date: &str) -> Option<PivotLevels> {
        self.daily.get(date).map(pivot::calculate)
    }

    /// Today's record, if any observation happened today.
    #[must_use]
    pub fn today(&self) -> Option<&DailyRecord> {
        self.daily.get(&today_key())
    }

    #[must_use]
    pub fn baseline(&self) -> Option<Price> {
        self.baseline
    }

    pub fn set_baseline(&mut self, price: Price) {
        self.baseline = Some(price);
    }

    /// Idempotent subscription. Returns whether the chat was new.
    pub fn subscribe(&mut self, chat: ChatId) -> bool {
        self.subscribers.insert(chat)
    }

    #[must_use]
    pub fn has_subscribers(&self) -> bool {
        !self.subscribers.is_empty()
    }

    /// Point-in-time copy for lock-free iteration during dispatch.
    /// Subscribers added after the snapshot is taken are not part of the
    /// broadcast already in flight.
    #[must_use]
    pub fn subscriber_snapshot(&self) -> Vec<ChatId> {
        self.subscribers.iter().copied().collect()
    }

    /// The persisted shape: the daily map plus the history as a list.
    #[must_use]
    pub fn snapshot_for_store(&self) -> (DailyRecordMap, Vec<Price>) {
        (self.daily.clone(), self.history.to_vec())
    }
}
