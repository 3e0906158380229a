//! Bounded, newest-first history of checks mirrored into one storage slot.
//!
//! The slot is only ever written with a non-empty JSON array. An empty
//! history removes the slot, so "no history" and `[]` are never both on disk.

use std::sync::Arc;

use crate::clock::Clock;
use crate::error::{Result, VeracityError};
use crate::models::{CheckResult, HistoryItem};
use crate::storage::KeyValueStore;

/// Characters of the input kept in a history snippet.
pub const SNIPPET_CHARS: usize = 100;

pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
    capacity: usize,
    items: Vec<HistoryItem>,
}

impl HistoryStore {
    /// Empty history bound to `key`. Nothing is read or written.
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, capacity: usize) -> Self {
        Self {
            store,
            key: key.into(),
            capacity: capacity.max(1),
            items: Vec::new(),
        }
    }

    /// Load the persisted slot. A malformed slot is logged and ignored; the
    /// bytes stay on disk until the next append overwrites them.
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>, capacity: usize) -> Result<Self> {
        let mut history = Self::new(store, key, capacity);
        match history.read_slot() {
            Ok(items) => history.set_loaded(items),
            Err(VeracityError::CorruptHistory { key, reason }) => {
                tracing::warn!("Discarding unreadable history in slot '{}': {}", key, reason);
            }
            Err(e) => return Err(e),
        }
        Ok(history)
    }

    /// Like [`HistoryStore::load`] but a malformed slot is an error.
    pub fn load_strict(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        capacity: usize,
    ) -> Result<Self> {
        let mut history = Self::new(store, key, capacity);
        let items = history.read_slot()?;
        history.set_loaded(items);
        Ok(history)
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Record a finished check at the front, evict past capacity, persist.
    ///
    /// The in-memory list is updated even when the write fails.
    pub fn append(&mut self, text: &str, result: CheckResult, clock: &dyn Clock) -> Result<()> {
        let now = clock.now();
        let mut id = now.timestamp_millis();
        if let Some(newest) = self.items.first() {
            if id <= newest.id {
                id = newest.id + 1;
            }
        }

        let item = HistoryItem {
            id,
            snippet: snippet(text),
            result,
            date: clock.local_date(now),
        };

        self.items.insert(0, item);
        self.items.truncate(self.capacity);
        tracing::debug!("History now holds {} item(s), newest id {}", self.items.len(), id);
        self.persist()
    }

    /// Drop every item and remove the slot entirely.
    pub fn clear(&mut self) -> Result<()> {
        self.items.clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if self.items.is_empty() {
            return self.store.remove(&self.key);
        }
        let blob = serde_json::to_string(&self.items)?;
        self.store.set(&self.key, &blob)
    }

    fn read_slot(&self) -> Result<Vec<HistoryItem>> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(Vec::new()),
            Err(VeracityError::Json(e)) => return Err(self.corrupt(e)),
            Err(e) => return Err(e),
        };
        serde_json::from_str(&raw).map_err(|e| self.corrupt(e))
    }

    fn corrupt(&self, e: serde_json::Error) -> VeracityError {
        VeracityError::CorruptHistory {
            key: self.key.clone(),
            reason: e.to_string(),
        }
    }

    fn set_loaded(&mut self, mut items: Vec<HistoryItem>) {
        items.truncate(self.capacity);
        tracing::info!("Loaded {} history item(s) from slot '{}'", items.len(), self.key);
        self.items = items;
    }
}

impl std::fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("key", &self.key)
            .field("capacity", &self.capacity)
            .field("items", &self.items.len())
            .finish()
    }
}

/// First [`SNIPPET_CHARS`] characters plus an ellipsis, always appended.
pub fn snippet(text: &str) -> String {
    let mut s: String = text.chars().take(SNIPPET_CHARS).collect();
    s.push_str("...");
    s
}

// ============================================================================
// Tests
// ============================================================================
