//! Board configuration
//!
//! Settings are read from YAML. Every field has a default, so an empty
//! document (or a missing file) is a valid configuration:
//!
//! ```yaml
//! storage_key_prefix: board_order_v1
//! storage_dir: /home/me/.local/share/match-board
//! ```

use crate::error::{BoardError, Result};
use crate::order::{FileStorage, KeyValueStorage, MemoryStorage, OrderStore, DEFAULT_KEY_PREFIX};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Placeholder path reported for configuration parsed from a string
const INLINE_SOURCE: &str = "<inline>";

/// Settings for the order store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Prefix of the per-user storage key (`<prefix>:<user_id>`)
    pub storage_key_prefix: String,
    /// Directory for file-backed order storage. In-memory when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            storage_dir: None,
        }
    }
}

impl BoardConfig {
    /// Parse configuration from a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new(INLINE_SOURCE))
    }

    /// Load configuration from a YAML file. A missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no board config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn parse(content: &str, source: &Path) -> Result<Self> {
        // An empty document deserializes as null rather than an empty map.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml_ng::from_str(content)
            .map_err(|e| BoardError::config(source, e.to_string()))?;

        if config.storage_key_prefix.trim().is_empty() {
            return Err(BoardError::config(
                source,
                "storage_key_prefix must not be empty",
            ));
        }
        Ok(config)
    }

    /// Build the order store these settings describe
    pub fn order_store(&self) -> OrderStore<Box<dyn KeyValueStorage>> {
        let storage: Box<dyn KeyValueStorage> = match &self.storage_dir {
            Some(dir) => Box::new(FileStorage::new(dir)),
            None => Box::new(MemoryStorage::new()),
        };
        OrderStore::new(storage).with_key_prefix(self.storage_key_prefix.clone())
    }
}
