//! Exchange-agnostic domain types and pure decision logic.
//!
//! Nothing in this module performs IO or holds a lock; every function takes
//! values and returns derived results. Shared mutable state lives in
//! [`crate::app`], behind the orchestrator.

pub mod daily;
pub mod detector;
pub mod history;
pub mod pivot;
pub mod schedule;
mod subscriber;

pub use daily::{today_key, update_daily, DailyRecord, DailyRecordMap};
pub use detector::{Decision, DetectorConfig};
pub use history::RollingHistory;
pub use pivot::PivotLevels;
pub use subscriber::ChatId;

/// Raw integer quote from the feed (rials). Always positive in practice.
pub type Price = i64;
