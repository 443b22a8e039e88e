//! JSON file persistence.
//!
//! Two small files in the data directory: `daily_data.json` (the per-date
//! aggregate map) and `prices.json` (the rolling history as a plain list).
//! Saves go through a sibling temp file and an atomic rename so a crash
//! mid-write leaves the previous snapshot intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::domain::{DailyRecordMap, Price};
use crate::error::StoreError;
use crate::port::StateStore;

const DAILY_FILE: &str = "daily_data.json";
const HISTORY_FILE: &str = "prices.json";

/// File-backed store rooted at a data directory.
pub struct JsonStore {
    daily_path: PathBuf,
    history_path: PathBuf,
}

impl JsonStore {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            daily_path: data_dir.join(DAILY_FILE),
            history_path: data_dir.join(HISTORY_FILE),
        }
    }
}

#[async_trait]
impl StateStore for JsonStore {
    async fn load(&self) -> Result<(DailyRecordMap, Vec<Price>), StoreError> {
        let daily = read_json_or_default::<DailyRecordMap>(&self.daily_path).await?;
        let history = read_json_or_default::<Vec<Price>>(&self.history_path).await?;

        debug!(
            days = daily.len(),
            observations = history.len(),
            "Loaded persisted state"
        );
        Ok((daily, history))
    }

    async fn save(&self, daily: &DailyRecordMap, history: &[Price]) -> Result<(), StoreError> {
        write_json_atomic(&self.daily_path, daily).await?;
        write_json_atomic(&self.history_path, &history).await?;
        debug!("Persisted state");
        Ok(())
    }
}

async fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&content)?)
}

async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, serde_json::to_vec(value)?).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
