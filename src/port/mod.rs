//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams where the decision engine meets the outside world.
//! Adapters implement them for concrete transports; tests implement them
//! with scripted fakes.
//!
//! - [`PriceSource`] - the external price feed
//! - [`Messenger`] - outbound message delivery
//! - [`StateStore`] - crash-safe persistence of the daily aggregate and
//!   rolling history

mod messenger;
mod price_source;
mod store;

pub use messenger::Messenger;
pub use price_source::PriceSource;
pub use store::StateStore;
