//! Application orchestration: the cycle state machine and its shared state.

mod orchestrator;
mod state;

pub use orchestrator::{InboundEvent, Orchestrator};
pub use state::MarketState;
