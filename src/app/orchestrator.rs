//! The cycle state machine.
//!
//! Every cycle runs Fetch -> Aggregate (persisting as a side effect) ->
//! Decide -> Dispatch and returns to idle; a fetch failure routes straight
//! to Dispatch with an error message. Automatic cycles come from a fixed
//! timer and are gated by subscribers and active hours; manual cycles come
//! from inbound commands, bypass the gate, and reply only to the requester.
//!
//! Two execution contexts feed this machine concurrently (the timer loop
//! and the Telegram command handlers). All state mutation, including the
//! persistence write, happens under one lock; a second, outer guard keeps
//! cycles from overlapping so at most one fetch is ever in flight.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveTime;
use rust_decimal::prelude::ToPrimitive;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::domain::{detector, schedule, today_key};
use crate::domain::{ChatId, DailyRecord, DetectorConfig, PivotLevels, Price};
use crate::port::{Messenger, PriceSource, StateStore};

use super::state::MarketState;

/// Discrete events delivered by the inbound transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundEvent {
    Subscribe(ChatId),
    ManualQuery(ChatId),
    StatsQuery(ChatId),
}

/// Owns the shared state and serializes the periodic cycle against
/// on-demand triggers.
pub struct Orchestrator {
    state: Mutex<MarketState>,
    /// Held for the duration of a cycle. The timer path uses `try_lock`
    /// and drops its tick when a cycle is in flight; manual triggers wait.
    cycle_guard: Mutex<()>,
    source: Arc<dyn PriceSource>,
    messenger: Arc<dyn Messenger>,
    store: Arc<dyn StateStore>,
    detector: DetectorConfig,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        source: Arc<dyn PriceSource>,
        messenger: Arc<dyn Messenger>,
        store: Arc<dyn StateStore>,
        detector: DetectorConfig,
    ) -> Self {
        Self {
            state: Mutex::new(MarketState::new()),
            cycle_guard: Mutex::new(()),
            source,
            messenger,
            store,
            detector,
        }
    }

    /// Seed state from the store. A failed load degrades to empty state
    /// with a warning; it never blocks startup.
    pub async fn restore(&self) {
        let (daily, history) = match self.store.load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Could not load persisted state, starting empty");
                Default::default()
            }
        };

        info!(
            days = daily.len(),
            observations = history.len(),
            "State restored"
        );
        *self.state.lock().await = MarketState::from_snapshot(daily, history);
    }

    /// The periodic timer loop. Runs for the process lifetime.
    pub async fn run(self: Arc<Self>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // interval() fires immediately; the first cycle should wait a full period.
        ticker.tick().await;

        info!(interval_secs = interval.as_secs(), "Timer loop started");

        loop {
            ticker.tick().await;
            match self.cycle_guard.try_lock() {
                Ok(_guard) => self.automatic_cycle(chrono::Local::now().time()).await,
                Err(_) => debug!("Cycle still in flight, tick dropped"),
            }
        }
    }

    /// Handle one inbound event from the messaging transport.
    pub async fn handle(&self, event: InboundEvent) {
        match event {
            InboundEvent::Subscribe(chat) => self.subscribe(chat).await,
            InboundEvent::ManualQuery(chat) => self.manual_cycle(chat).await,
            InboundEvent::StatsQuery(chat) => self.stats(chat).await,
        }
    }

    /// One automatic cycle as of the given wall-clock time.
    ///
    /// Skipped entirely when nobody is subscribed or outside active hours.
    pub async fn automatic_cycle(&self, now: NaiveTime) {
        if !self.state.lock().await.has_subscribers() {
            debug!("No subscribers, cycle skipped");
            return;
        }
        if !schedule::is_active(now) {
            debug!(%now, "Outside active hours, cycle skipped");
            return;
        }

        let price = match self.source.fetch().await {
            Ok(price) => price,
            Err(e) => {
                error!(error = %e, "Price fetch failed");
                let targets = self.state.lock().await.subscriber_snapshot();
                self.broadcast(&targets, FETCH_ERROR_TEXT).await;
                return;
            }
        };

        let (decision, levels, targets) = {
            let mut state = self.state.lock().await;
            let date = today_key();
            state.observe(&date, price);
            self.persist(&state).await;

            let levels = state.pivot_levels(&date);
            let decision =
                detector::evaluate(price, state.baseline(), levels.as_ref(), &self.detector);
            if let Some(baseline) = decision.new_baseline {
                state.set_baseline(baseline);
            }
            (decision, levels, state.subscriber_snapshot())
        };

        if decision.notify {
            info!(
                price,
                near_pivot = decision.near_pivot,
                targets = targets.len(),
                "Significant move, notifying"
            );
            self.broadcast(&targets, &format_price_message(price, levels.as_ref()))
                .await;
        } else {
            debug!(price, "No trigger, silent cycle");
        }
    }

    /// One manual cycle: same pipeline, no gate, no baseline update, reply
    /// to the requester only.
    async fn manual_cycle(&self, chat: ChatId) {
        let _guard = self.cycle_guard.lock().await;
        info!(%chat, "Manual price query");

        let price = match self.source.fetch().await {
            Ok(price) => price,
            Err(e) => {
                error!(%chat, error = %e, "Price fetch failed");
                self.send_one(chat, FETCH_ERROR_TEXT).await;
                return;
            }
        };

        let levels = {
            let mut state = self.state.lock().await;
            let date = today_key();
            state.observe(&date, price);
            self.persist(&state).await;
            state.pivot_levels(&date)
        };

        self.send_one(chat, &format_price_message(price, levels.as_ref()))
            .await;
    }

    async fn subscribe(&self, chat: ChatId) {
        let newly_added = self.state.lock().await.subscribe(chat);
        if newly_added {
            // The set only ever grows; keep that visible in the logs.
            info!(%chat, "New subscriber");
        }
        self.send_one(chat, WELCOME_TEXT).await;
    }

    async fn stats(&self, chat: ChatId) {
        let today = self.state.lock().await.today().cloned();
        let text = match today {
            Some(record) => format_stats_message(&record),
            None => NO_DATA_TEXT.to_string(),
        };
        self.send_one(chat, &text).await;
    }

    /// Persist under the state lock so the written snapshot is never torn.
    async fn persist(&self, state: &MarketState) {
        let (daily, history) = state.snapshot_for_store();
        if let Err(e) = self.store.save(&daily, &history).await {
            warn!(error = %e, "Persistence failed, in-memory state stays authoritative");
        }
    }

    /// Send to every target, isolating per-target failures.
    async fn broadcast(&self, targets: &[ChatId], text: &str) {
        for chat in targets {
            if let Err(e) = self.messenger.send(*chat, text).await {
                error!(%chat, error = %e, "Delivery failed");
            }
        }
    }

    async fn send_one(&self, chat: ChatId, text: &str) {
        if let Err(e) = self.messenger.send(chat, text).await {
            error!(%chat, error = %e, "Delivery failed");
        }
    }
}

const FETCH_ERROR_TEXT: &str = "Failed to fetch the current price from the feed.";
const WELCOME_TEXT: &str =
    "Subscribed to price alerts. Use /price for an on-demand quote and /stats for today's range.";
const NO_DATA_TEXT: &str = "No price data for today yet.";

fn format_price_message(price: Price, levels: Option<&PivotLevels>) -> String {
    let mut text = format!("Current price: {}", group_digits(price));
    if let Some(levels) = levels {
        // Full precision is for comparisons; display rounds.
        if let Some(pivot) = levels.pivot.round().to_i64() {
            text.push_str(&format!("\nPivot: {}", group_digits(pivot)));
        }
    }
    text
}

fn format_stats_message(record: &DailyRecord) -> String {
    format!(
        "Today's range:\nHigh: {}\nLow: {}\nClose: {}",
        group_digits(record.high),
        group_digits(record.low),
        group_digits(record.close),
    )
}

fn group_digits(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_are_grouped_in_threes() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(950), "950");
        assert_eq!(group_digits(1_000), "1,000");
        assert_eq!(group_digits(12_345_678), "12,345,678");
        assert_eq!(group_digits(-4_200), "-4,200");
    }

    #[test]
    fn price_message_includes_rounded_pivot_when_available() {
        let levels = crate::domain::pivot::calculate(&DailyRecord {
            high: 1000,
            low: 900,
            close: 950,
        });

        let text = format_price_message(1_000_000, Some(&levels));
        assert_eq!(text, "Current price: 1,000,000\nPivot: 950");

        let text = format_price_message(1_000_000, None);
        assert_eq!(text, "Current price: 1,000,000");
    }

    #[test]
    fn stats_message_lists_the_range() {
        let text = format_stats_message(&DailyRecord {
            high: 4_210_000,
            low: 4_180_000,
            close: 4_200_000,
        });

        assert!(text.contains("High: 4,210,000"));
        assert!(text.contains("Low: 4,180,000"));
        assert!(text.contains("Close: 4,200,000"));
    }
}
