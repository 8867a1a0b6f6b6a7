use std::collections::HashMap;
use std::sync::Mutex;

use super::{Store, StoreError};

/// In-memory store. Used by tests and available for ephemeral runs where
/// nothing should touch disk.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, handy for simulating previously persisted state.
    pub fn with_entries(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        MemoryStore {
            entries: Mutex::new(entries.into_iter().collect()),
        }
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
