//! In-memory conversation store.

use std::collections::HashMap;

use flowbot_engine::{ChatId, MemoryRecord};
use tokio::sync::Mutex;

/// Holds the record each active chat is parked on. A chat with no record
/// starts fresh from the given start state; reaching the end of a
/// conversation removes the record, so the next message starts over.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<ChatId, MemoryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load_or_start(&self, chat_id: ChatId, start_id: &str) -> MemoryRecord {
        let records = self.records.lock().await;
        records.get(&chat_id).cloned().unwrap_or_else(|| MemoryRecord::new(start_id))
    }

    pub async fn save(&self, chat_id: ChatId, record: MemoryRecord) {
        self.records.lock().await.insert(chat_id, record);
    }

    pub async fn evict(&self, chat_id: ChatId) {
        self.records.lock().await.remove(&chat_id);
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}
