//! Classic floor-trader pivot levels.

use rust_decimal::Decimal;

use super::DailyRecord;

/// The five pivot levels derived from a day's high/low/close.
///
/// Derived on demand, never stored. Kept as [`Decimal`] so the thirds stay
/// exact for comparisons; rounding is a display concern.
///
/// Invariant: `s2 < s1 < pivot < r1 < r2` whenever `high > low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PivotLevels {
    pub pivot: Decimal,
    pub r1: Decimal,
    pub s1: Decimal,
    pub r2: Decimal,
    pub s2: Decimal,
}

impl PivotLevels {
    /// All five levels, for nearest-level scans.
    #[must_use]
    pub fn all(&self) -> [Decimal; 5] {
        [self.pivot, self.r1, self.s1, self.r2, self.s2]
    }
}

/// Compute pivot levels from a daily record.
///
/// `pivot = (h + l + c) / 3`, `r1 = 2p - l`, `s1 = 2p - h`,
/// `r2 = p + (h - l)`, `s2 = p - (h - l)`.
#[must_use]
pub fn calculate(record: &DailyRecord) -> PivotLevels {
    let high = Decimal::from(record.high);
    let low = Decimal::from(record.low);
    let close = Decimal::from(record.close);

    let pivot = (high + low + close) / Decimal::from(3);
    let range = high - low;

    PivotLevels {
        pivot,
        r1: Decimal::from(2) * pivot - low,
        s1: Decimal::from(2) * pivot - high,
        r2: pivot + range,
        s2: pivot - range,
    }
}
