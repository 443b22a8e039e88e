//! Adapter implementations of the ports.
//!
//! - [`brsapi`] - BrsApi.ir HTTP price feed
//! - [`telegram`] - teloxide-backed messaging and inbound commands
//! - [`json_store`] - JSON file persistence

pub mod brsapi;
pub mod json_store;
pub mod telegram;

pub use brsapi::BrsApiSource;
pub use json_store::JsonStore;
pub use telegram::TelegramMessenger;
