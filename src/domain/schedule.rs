//! Active-hours gate for the automatic cycle.

use chrono::NaiveTime;

/// Whether automatic notifications are permitted at `now`.
///
/// Active when `11:00 <= now <= 19:00`, or `now >= 22:30`, or
/// `now <= 06:30`, all boundaries inclusive. The three clauses are kept
/// literally as configured in production: the 19:00-22:30 gap is the only
/// quiet window, and the two night clauses wrap midnight between them.
///
/// Manual queries bypass this gate entirely.
#[must_use]
pub fn is_active(now: NaiveTime) -> bool {
    let day_open = NaiveTime::from_hms_opt(11, 0, 0).expect("valid time");
    let day_close = NaiveTime::from_hms_opt(19, 0, 0).expect("valid time");
    let night_open = NaiveTime::from_hms_opt(22, 30, 0).expect("valid time");
    let night_close = NaiveTime::from_hms_opt(6, 30, 0).expect("valid time");

    (day_open <= now && now <= day_close) || now >= night_open || now <= night_close
}
