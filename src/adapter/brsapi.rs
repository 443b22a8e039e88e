//! BrsApi.ir price feed adapter.
//!
//! The feed has served two response shapes over time: a flat list of
//! symbol records, and an object of category lists wrapping the same
//! records. Parsing is a list of named strategies tried in order; each
//! either declines (shape mismatch) or yields the candidate records.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::FeedConfig;
use crate::domain::Price;
use crate::error::{FetchError, Result};
use crate::port::PriceSource;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 OPR/106.0.0.0";

/// HTTP client for the BrsApi.ir symbol feed.
pub struct BrsApiSource {
    client: Client,
    config: FeedConfig,
}

impl BrsApiSource {
    /// Build the client with the configured timeout and TLS policy.
    ///
    /// The upstream endpoint has a history of certificate trouble, so TLS
    /// verification can be relaxed by configuration; it defaults to on.
    pub fn new(config: FeedConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait::async_trait]
impl PriceSource for BrsApiSource {
    async fn fetch(&self) -> std::result::Result<Price, FetchError> {
        debug!(url = %self.config.url, "Requesting quote");

        let response = self
            .client
            .get(&self.config.url)
            .query(&[("key", self.config.api_key.as_str())])
            .header("Accept", "application/json, text/plain, */*")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        let price = extract_price(&body, &self.config.symbol)?;
        info!(symbol = %self.config.symbol, price, "Quote received");
        Ok(price)
    }
}

/// A parsing strategy yields the candidate symbol records, or declines.
type ShapeStrategy = fn(&Value) -> Option<Vec<&Value>>;

const STRATEGIES: &[(&str, ShapeStrategy)] =
    &[("flat_list", flat_list), ("categorised", categorised)];

/// Flat shape: the body is itself the list of symbol records.
fn flat_list(body: &Value) -> Option<Vec<&Value>> {
    body.as_array().map(|records| records.iter().collect())
}

/// Wrapped shape: an object whose values are lists of symbol records.
fn categorised(body: &Value) -> Option<Vec<&Value>> {
    body.as_object().map(|categories| {
        categories
            .values()
            .filter_map(Value::as_array)
            .flatten()
            .collect()
    })
}

/// Select the target symbol's record via the first matching shape strategy
/// and normalize its price to an integer.
fn extract_price(body: &Value, symbol: &str) -> std::result::Result<Price, FetchError> {
    for (name, strategy) in STRATEGIES {
        let Some(records) = strategy(body) else {
            continue;
        };
        debug!(strategy = name, records = records.len(), "Feed shape matched");

        let record = records
            .iter()
            .find(|r| r.get("symbol").and_then(Value::as_str) == Some(symbol))
            .ok_or_else(|| FetchError::SymbolNotFound(symbol.to_string()))?;

        let raw = record
            .get("price")
            .ok_or_else(|| FetchError::Malformed(format!("record for '{symbol}' has no price")))?;

        return normalize_price(raw, symbol);
    }

    Err(FetchError::Malformed(
        "response is neither a record list nor a category object".into(),
    ))
}

/// Prices arrive either as JSON numbers or as strings with grouping
/// separators ("12,345,678"). The feed reports a missing quote as "0";
/// only positive prices are valid.
fn normalize_price(raw: &Value, symbol: &str) -> std::result::Result<Price, FetchError> {
    let invalid = |raw: &Value| FetchError::InvalidPrice {
        symbol: symbol.to_string(),
        raw: raw.to_string(),
    };

    let price = match raw {
        Value::Number(n) => n.as_i64().ok_or_else(|| invalid(raw))?,
        Value::String(s) => s
            .replace(',', "")
            .trim()
            .parse::<Price>()
            .map_err(|_| invalid(raw))?,
        _ => return Err(invalid(raw)),
    };

    if price <= 0 {
        return Err(invalid(raw));
    }
    Ok(price)
}
