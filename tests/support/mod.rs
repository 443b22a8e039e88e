#![allow(dead_code)]

//! Scripted fakes for the ports, shared by the integration tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use pivotwatch::domain::{ChatId, DailyRecordMap, Price};
use pivotwatch::error::{FetchError, SendError, StoreError};
use pivotwatch::port::{Messenger, PriceSource, StateStore};

/// Price source that replays a scripted sequence of outcomes.
#[derive(Default)]
pub struct ScriptedSource {
    outcomes: Mutex<VecDeque<Result<Price, FetchError>>>,
    calls: Mutex<usize>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_price(&self, price: Price) {
        self.outcomes.lock().unwrap().push_back(Ok(price));
    }

    pub fn push_error(&self) {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(FetchError::Status(502)));
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl PriceSource for ScriptedSource {
    async fn fetch(&self) -> Result<Price, FetchError> {
        *self.calls.lock().unwrap() += 1;
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(FetchError::Status(599)))
    }
}

/// Messenger that records every delivery attempt and can be told to fail
/// for specific chats.
#[derive(Default)]
pub struct RecordingMessenger {
    attempts: Mutex<Vec<(ChatId, String)>>,
    failing: Mutex<HashSet<ChatId>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, chat: ChatId) {
        self.failing.lock().unwrap().insert(chat);
    }

    pub fn attempts(&self) -> Vec<(ChatId, String)> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn texts_for(&self, chat: ChatId) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, _)| *c == chat)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, chat: ChatId, text: &str) -> Result<(), SendError> {
        self.attempts.lock().unwrap().push((chat, text.to_string()));
        if self.failing.lock().unwrap().contains(&chat) {
            return Err(SendError("scripted failure".into()));
        }
        Ok(())
    }
}

/// In-memory store with a save counter and an optional scripted failure.
#[derive(Default)]
pub struct MemoryStore {
    snapshot: Mutex<(DailyRecordMap, Vec<Price>)>,
    saves: Mutex<usize>,
    fail_loads: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preloaded(daily: DailyRecordMap, history: Vec<Price>) -> Self {
        let store = Self::default();
        *store.snapshot.lock().unwrap() = (daily, history);
        store
    }

    pub fn fail_loads(&self) {
        *self.fail_loads.lock().unwrap() = true;
    }

    pub fn saves(&self) -> usize {
        *self.saves.lock().unwrap()
    }

    pub fn snapshot(&self) -> (DailyRecordMap, Vec<Price>) {
        self.snapshot.lock().unwrap().clone()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> Result<(DailyRecordMap, Vec<Price>), StoreError> {
        if *self.fail_loads.lock().unwrap() {
            return Err(StoreError::Io(std::io::Error::other("scripted failure")));
        }
        Ok(self.snapshot.lock().unwrap().clone())
    }

    async fn save(&self, daily: &DailyRecordMap, history: &[Price]) -> Result<(), StoreError> {
        *self.snapshot.lock().unwrap() = (daily.clone(), history.to_vec());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
