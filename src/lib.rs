//! pivotwatch - gold price monitoring with pivot-level alerts.
//!
//! Watches a market price over an HTTP feed, keeps a rolling daily
//! high/low/close aggregate, derives classic floor-trader pivot levels from
//! it, and notifies Telegram subscribers when a move is significant: either
//! a percentage change from the last-notified price or proximity to a pivot
//! level.
//!
//! # Architecture
//!
//! Hexagonal: the decision engine is pure and lives in [`domain`]; the
//! outside world is reached through the traits in [`port`], implemented by
//! [`adapter`]; [`app`] owns the shared state and runs the cycle state
//! machine under a single lock, with a periodic timer racing on-demand
//! Telegram commands.
//!
//! # Modules
//!
//! - [`config`] - TOML + environment configuration and logging setup
//! - [`domain`] - daily aggregation, pivot math, change detection,
//!   active-hours gate
//! - [`port`] - `PriceSource`, `Messenger`, `StateStore` traits
//! - [`adapter`] - BrsApi feed, Telegram bot, JSON file store
//! - [`app`] - orchestrator and market state
//! - [`error`] - error taxonomy

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod port;
