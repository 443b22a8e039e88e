//! Outbound messaging port.

use async_trait::async_trait;

use crate::domain::ChatId;
use crate::error::SendError;

/// One message to one target. The core calls this once per notification
/// per target and never retries; the dispatcher isolates failures so one
/// bad target cannot starve the rest of a broadcast.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, chat: ChatId, text: &str) -> Result<(), SendError>;
}
