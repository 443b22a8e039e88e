//! Significant-change detection.
//!
//! Two independent triggers, OR-ed:
//!
//! - **percentage**: the move from the last-notified baseline meets the
//!   configured percentage (inclusive); this path adopts the new price as
//!   the baseline.
//! - **proximity**: the price is within the configured distance of any
//!   pivot level; this path never touches the baseline, so repeated
//!   near-pivot prices keep re-triggering instead of being swallowed by a
//!   stale baseline.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::{PivotLevels, Price};

/// Detector thresholds.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Maximum distance from a pivot level for the proximity trigger.
    #[serde(default = "default_pivot_threshold")]
    pub pivot_threshold: Decimal,

    /// Minimum percentage move from the baseline, inclusive.
    #[serde(default = "default_min_change_pct")]
    pub min_change_pct: Decimal,
}

fn default_pivot_threshold() -> Decimal {
    Decimal::from(300)
}

fn default_min_change_pct() -> Decimal {
    Decimal::new(2, 1) // 0.2%
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            pivot_threshold: default_pivot_threshold(),
            min_change_pct: default_min_change_pct(),
        }
    }
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether any trigger fired.
    pub notify: bool,
    /// New baseline to adopt; `None` means leave it untouched.
    pub new_baseline: Option<Price>,
    /// Whether the proximity trigger fired (for log context).
    pub near_pivot: bool,
}

impl Decision {
    fn silent() -> Self {
        Self {
            notify: false,
            new_baseline: None,
            near_pivot: false,
        }
    }
}

/// Evaluate one price against the baseline and the current pivot levels.
///
/// The first-ever price always notifies and seeds the baseline.
#[must_use]
pub fn evaluate(
    price: Price,
    baseline: Option<Price>,
    levels: Option<&PivotLevels>,
    config: &DetectorConfig,
) -> Decision {
    let near_pivot = levels.is_some_and(|l| is_near_level(price, l, config.pivot_threshold));

    match baseline {
        None => Decision {
            notify: true,
            new_baseline: Some(price),
            near_pivot,
        },
        Some(last) => {
            let moved = percentage_move(price, last) >= config.min_change_pct;
            if moved || near_pivot {
                Decision {
                    notify: true,
                    // The proximity path deliberately leaves the baseline alone.
                    new_baseline: moved.then_some(price),
                    near_pivot,
                }
            } else {
                Decision::silent()
            }
        }
    }
}

fn percentage_move(price: Price, baseline: Price) -> Decimal {
    if baseline == 0 {
        // No meaningful percentage from a zero baseline; count any move
        // as maximal rather than divide by it. The feed adapter rejects
        // non-positive quotes, so this only matters for direct callers.
        return Decimal::MAX;
    }
    let delta = Decimal::from((price - baseline).abs());
    delta / Decimal::from(baseline) * Decimal::from(100)
}

fn is_near_level(price: Price, levels: &PivotLevels, threshold: Decimal) -> bool {
    let price = Decimal::from(price);
    levels
        .all()
        .iter()
        .any(|level| (price - level).abs() <= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{pivot, DailyRecord};
    use rust_decimal_macros::dec;

    fn far_levels() -> PivotLevels {
        // Levels: s2=1_000_000, s1=1_020_000, pivot=1_040_000,
        // r1=1_060_000, r2=1_080_000.
        pivot::calculate(&DailyRecord {
            high: 1_060_000,
            low: 1_020_000,
            close: 1_040_000,
        })
    }

    #[test]
    fn first_price_always_notifies_and_seeds_baseline() {
        let decision = evaluate(1_000_000, None, None, &DetectorConfig::default());

        assert!(decision.notify);
        assert_eq!(decision.new_baseline, Some(1_000_000));
    }

    #[test]
    fn exact_boundary_percentage_triggers() {
        // 0.2% of 1_000_000 is exactly 2_000.
        let decision = evaluate(
            1_002_000,
            Some(1_000_000),
            None,
            &DetectorConfig::default(),
        );

        assert!(decision.notify);
        assert_eq!(decision.new_baseline, Some(1_002_000));
    }

    #[test]
    fn just_below_boundary_stays_silent() {
        let decision = evaluate(
            1_001_999,
            Some(1_000_000),
            None,
            &DetectorConfig::default(),
        );

        assert!(!decision.notify);
        assert_eq!(decision.new_baseline, None);
    }

    #[test]
    fn proximity_triggers_with_zero_percentage_move() {
        let levels = pivot::calculate(&DailyRecord {
            high: 1_000_100,
            low: 999_900,
            close: 1_000_000,
        });
        // Identical to the baseline: pct move is 0, but the price sits on
        // the pivot itself.
        let decision = evaluate(
            1_000_000,
            Some(1_000_000),
            Some(&levels),
            &DetectorConfig::default(),
        );

        assert!(decision.notify);
        assert!(decision.near_pivot);
        assert_eq!(decision.new_baseline, None);
    }

    #[test]
    fn proximity_retriggers_on_repeated_identical_price() {
        let levels = pivot::calculate(&DailyRecord::seeded(1_000_000));
        let config = DetectorConfig::default();

        let first = evaluate(1_000_000, Some(1_000_000), Some(&levels), &config);
        assert!(first.notify);
        assert_eq!(first.new_baseline, None);

        // Baseline unchanged, so the same price fires again.
        let second = evaluate(1_000_000, Some(1_000_000), Some(&levels), &config);
        assert!(second.notify);
    }

    #[test]
    fn proximity_respects_inclusive_distance() {
        let levels = pivot::calculate(&DailyRecord::seeded(1_000_000));
        let config = DetectorConfig::default();

        assert!(evaluate(1_000_300, Some(1_000_000), Some(&levels), &config).near_pivot);
        assert!(!evaluate(1_000_301, Some(1_000_000), Some(&levels), &config).near_pivot);
    }

    #[test]
    fn no_trigger_when_far_from_levels_and_under_threshold() {
        let levels = far_levels();
        // 0.1% move, and the nearest level (s2) is 1_000 away.
        let decision = evaluate(
            1_001_000,
            Some(1_000_000),
            Some(&levels),
            &DetectorConfig::default(),
        );

        assert!(!decision.notify);
    }

    #[test]
    fn zero_baseline_does_not_panic_and_counts_as_a_move() {
        let decision = evaluate(4_200_000, Some(0), None, &DetectorConfig::default());

        assert!(decision.notify);
        assert_eq!(decision.new_baseline, Some(4_200_000));
    }

    #[test]
    fn custom_thresholds_are_honored() {
        let config = DetectorConfig {
            pivot_threshold: Decimal::ZERO,
            min_change_pct: dec!(1),
        };
        let levels = far_levels();

        let decision = evaluate(1_005_000, Some(1_000_000), Some(&levels), &config);
        assert!(!decision.notify, "0.5% move under a 1% threshold");

        let decision = evaluate(1_010_000, Some(1_000_000), Some(&levels), &config);
        assert!(decision.notify);
    }
}
