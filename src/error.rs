use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures while fetching a quote from the price feed.
///
/// All of these are soft: the cycle that hit one reports it to its target
/// set and ends; the next timer tick is the implicit retry.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("price feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("price feed returned status {0}")]
    Status(u16),

    #[error("malformed feed response: {0}")]
    Malformed(String),

    #[error("symbol '{0}' not present in feed response")]
    SymbolNotFound(String),

    #[error("non-numeric price '{raw}' for symbol '{symbol}'")]
    InvalidPrice { symbol: String, raw: String },
}

/// Persistence failures. Never fatal: in-memory state stays authoritative
/// for the rest of the process run.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single message delivery failed. Isolated per target by the dispatcher.
#[derive(Error, Debug)]
#[error("message delivery failed: {0}")]
pub struct SendError(pub String);

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Send(#[from] SendError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
