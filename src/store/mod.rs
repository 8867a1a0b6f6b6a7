pub mod memory;
pub mod repository;
pub mod sled_store;

pub use memory::MemoryStore;
pub use repository::ReportRepository;
pub use sled_store::SledStore;

use thiserror::Error;

/// Key holding the JSON-serialized ordered report sequence.
pub const REPORTS_KEY: &str = "reports";
/// Key holding the last-used sender name.
pub const SENDER_NAME_KEY: &str = "sender_name";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("stored value is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Key-value persistence surviving restarts. Injected into the repository so
/// the lifecycle logic stays testable without a real storage backend.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;
}
