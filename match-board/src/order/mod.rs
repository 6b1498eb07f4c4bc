//! Per-user persisted card order
//!
//! The system of record knows each match's status but not where the user
//! put it inside a lane. [`OrderStore`] keeps that order in a keyed
//! [`KeyValueStorage`], one [`OrderRecord`] per user.
//!
//! Card order is a convenience, not correctness-critical data: loading never
//! fails (missing or corrupt data yields an empty record) and saving swallows
//! errors after logging them.

mod record;
mod storage;

pub use record::OrderRecord;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};

use crate::error::StorageError;
use crate::types::UserId;

/// Default storage key prefix. Versioned so the format can change freely.
pub const DEFAULT_KEY_PREFIX: &str = "board_order_v1";

/// Loads and saves [`OrderRecord`]s through a keyed storage backend
#[derive(Debug)]
pub struct OrderStore<S> {
    storage: S,
    key_prefix: String,
}

impl<S: KeyValueStorage> OrderStore<S> {
    /// Create a store using the default key prefix
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    /// Use a different key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Storage key for a user's record
    pub fn key_for(&self, user: &UserId) -> String {
        format!("{}:{}", self.key_prefix, user)
    }

    /// Get the backing storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load a user's record. Every lane is present; never fails.
    pub fn load(&self, user: &UserId) -> OrderRecord {
        let key = self.key_for(user);
        match self.read(&key) {
            Ok(Some(mut record)) => {
                // Fill lanes missing from older or hand-edited records.
                record.reconcile_columns();
                record
            }
            Ok(None) => OrderRecord::new(),
            Err(e) => {
                tracing::warn!("discarding card order {}: {}", key, e);
                OrderRecord::new()
            }
        }
    }

    /// Save a user's record. Failures are logged and swallowed.
    pub fn save(&self, user: &UserId, record: &OrderRecord) {
        let key = self.key_for(user);
        match self.write(&key, record) {
            Ok(()) => tracing::debug!("saved card order {} ({} ids)", key, record.len()),
            Err(e) => tracing::warn!("failed to save card order {}: {}", key, e),
        }
    }

    fn read(&self, key: &str) -> Result<Option<OrderRecord>, StorageError> {
        match self.storage.get(key)? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, record: &OrderRecord) -> Result<(), StorageError> {
        let content = serde_json::to_string(record)?;
        self.storage.set(key, &content)
    }
}
