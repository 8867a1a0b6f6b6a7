use std::path::Path;

use super::{Store, StoreError};

/// Embedded key-value store backing the report archive across restarts.
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        tracing::info!("Persistent store opened");
        Ok(SledStore { db })
    }
}

impl Store for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self.db.get(key)? {
            Some(value) => Ok(Some(String::from_utf8(value.to_vec())?)),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.db.insert(key, value.as_bytes())?;
        self.db.flush()?;
        Ok(())
    }
}
