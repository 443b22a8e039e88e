//! Daily high/low/close aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Price;

/// One calendar day's aggregate. The date is the key of the containing
/// [`DailyRecordMap`], not a field, matching the persisted JSON shape.
///
/// Invariant: `low <= close <= high` after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub high: Price,
    pub low: Price,
    pub close: Price,
}

impl DailyRecord {
    /// A fresh record seeded from a single observation.
    #[must_use]
    pub fn seeded(price: Price) -> Self {
        Self {
            high: price,
            low: price,
            close: price,
        }
    }

    /// Fold one observation into the record.
    pub fn observe(&mut self, price: Price) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }
}

/// Records keyed by local `YYYY-MM-DD` date string. Never pruned by the
/// core; retention is an external concern.
pub type DailyRecordMap = BTreeMap<String, DailyRecord>;

/// Today's map key from the local clock.
#[must_use]
pub fn today_key() -> String {
    chrono::Local::now().date_naive().to_string()
}

/// Fold an observation into the record for `date`, creating it on the first
/// observation of a new date. Day rollover is lazy: nothing here runs on a
/// timer, the changed key does the work on the next observation.
pub fn update_daily(map: &mut DailyRecordMap, date: &str, price: Price) -> DailyRecord {
    let record = map
        .entry(date.to_string())
        .and_modify(|r| r.observe(price))
        .or_insert_with(|| DailyRecord::seeded(price));
    record.clone()
}
