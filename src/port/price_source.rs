//! Price source port.

use async_trait::async_trait;

use crate::domain::Price;
use crate::error::FetchError;

/// A single normalized quote from an external feed.
///
/// Implementations must bound their own blocking (a request timeout) and
/// must not retry internally; retry policy belongs to the caller, and in
/// this system the next timer tick is the retry.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self) -> Result<Price, FetchError>;
}
