//! Telegram messaging and inbound command handling.
//!
//! [`TelegramMessenger`] implements the outbound [`Messenger`] port;
//! [`command_worker`] long-polls the bot API and translates `/start`,
//! `/price`, and `/stats` into inbound events for the orchestrator.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::BotCommand;
use tracing::{info, warn};

use crate::app::{InboundEvent, Orchestrator};
use crate::domain::ChatId;
use crate::error::SendError;
use crate::port::Messenger;

/// Messenger backed by the Telegram bot API.
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    #[must_use]
    pub fn new(bot_token: &str) -> Self {
        Self {
            bot: Bot::new(bot_token),
        }
    }
}

#[async_trait::async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, chat: ChatId, text: &str) -> Result<(), SendError> {
        self.bot
            .send_message(teloxide::types::ChatId(chat.0), text)
            .await
            .map(|_| ())
            .map_err(|e| SendError(e.to_string()))
    }
}

/// Commands offered in the Telegram "/" menu.
fn bot_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("start", "Subscribe to automatic price alerts"),
        ("price", "Query the current price on demand"),
        ("stats", "Show today's high/low/close"),
    ]
}

/// Long-poll for bot commands and feed them to the orchestrator.
///
/// Runs for the process lifetime. Unknown messages are ignored.
pub async fn command_worker(bot_token: &str, orchestrator: Arc<Orchestrator>) {
    let bot = Bot::new(bot_token);

    if let Err(e) = register_bot_commands(&bot).await {
        warn!(error = %e, "Failed to register bot commands with Telegram");
    }

    info!("Telegram command listener started");

    teloxide::repl(bot, move |msg: Message| {
        let orchestrator = orchestrator.clone();
        async move {
            let chat = ChatId(msg.chat.id.0);
            let Some(event) = msg.text().and_then(|text| parse_command(text, chat)) else {
                return respond(());
            };

            orchestrator.handle(event).await;

            respond(())
        }
    })
    .await;
}

/// Map a message text to an inbound event. `None` for anything that is not
/// a recognized command (including `/cmd@OtherBot` mentions left intact).
fn parse_command(text: &str, chat: ChatId) -> Option<InboundEvent> {
    let command = text.split_whitespace().next()?;
    let command = command.split('@').next().unwrap_or(command);

    match command {
        "/start" => Some(InboundEvent::Subscribe(chat)),
        "/price" => Some(InboundEvent::ManualQuery(chat)),
        "/stats" => Some(InboundEvent::StatsQuery(chat)),
        _ => None,
    }
}

async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = bot_commands()
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}
