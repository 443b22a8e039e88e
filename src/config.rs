//! Configuration loading.
//!
//! Settings come from an optional TOML file, with secrets (`BOT_TOKEN`,
//! `API_KEY`) taken from the environment. Either secret missing is fatal
//! at startup: the process must not serve requests without its identity.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::DetectorConfig;
use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub monitor: MonitorConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    /// Telegram bot token, environment-only.
    #[serde(skip)]
    pub bot_token: String,
}

/// Price feed endpoint settings. The API key is environment-only.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    /// Symbol whose record is selected from the feed response.
    pub symbol: String,
    pub timeout_secs: u64,
    /// Relax TLS verification for the feed endpoint.
    pub accept_invalid_certs: bool,
    #[serde(skip)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between automatic cycles.
    pub interval_secs: u64,
    #[serde(flatten)]
    pub detector: DetectorConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding `daily_data.json` and `prices.json`.
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load from `path` (missing file falls back to defaults), then pull
    /// secrets from the environment and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        } else {
            Config::default()
        };

        config.bot_token = require_env("BOT_TOKEN")?;
        config.feed.api_key = require_env("API_KEY")?;
        config.validate()?;

        Ok(config)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.monitor.interval_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.feed.url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "feed.url",
                reason: "cannot be empty".into(),
            }
            .into());
        }
        if self.feed.symbol.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "feed.symbol",
                reason: "cannot be empty".into(),
            }
            .into());
        }
        if self.monitor.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "monitor.interval_secs",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.monitor.detector.min_change_pct.is_sign_negative() {
            return Err(ConfigError::InvalidValue {
                field: "monitor.min_change_pct",
                reason: "cannot be negative".into(),
            }
            .into());
        }
        Ok(())
    }
}

fn require_env(field: &'static str) -> Result<String> {
    match std::env::var(field) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingField { field }.into()),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            monitor: MonitorConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
            bot_token: String::new(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "https://BrsApi.ir/Api/Tsetmc/AllSymbols.php".into(),
            symbol: "IR_GOLD_MELTED".into(),
            timeout_secs: 10,
            accept_invalid_certs: false,
            api_key: String::new(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 120,
            detector: DetectorConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: ".".into(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    /// Initialize the tracing subscriber. `RUST_LOG` overrides the
    /// configured level.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => fmt().json().with_env_filter(filter).init(),
            _ => fmt().with_env_filter(filter).init(),
        }
    }
}
