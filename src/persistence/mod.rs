//! Key-value persistence with versioned records
//!
//! Features:
//! - `KeyValueStore` seam over LocalStorage (web) and an in-memory map
//! - Versioned JSON envelope for every record
//! - Failures surface as `PersistenceError`; callers log and carry on

pub mod envelope;

use std::collections::HashMap;

use thiserror::Error;

pub use envelope::{Envelope, decode, encode};

/// Why a read or write didn't happen
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage rejected {op} of {key:?}")]
    Backend { op: &'static str, key: String },
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("record version {found} is not supported (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Browser LocalStorage. Missing storage (private mode, sandboxed iframe)
/// turns every call into `PersistenceError::Unavailable`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - progress won't be saved");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, PersistenceError> {
        self.storage.as_ref().ok_or(PersistenceError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.storage()?
            .get_item(key)
            .map_err(|_| PersistenceError::Backend {
                op: "read",
                key: key.to_string(),
            })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|_| PersistenceError::Backend {
                op: "write",
                key: key.to_string(),
            })
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.storage()?
            .remove_item(key)
            .map_err(|_| PersistenceError::Backend {
                op: "remove",
                key: key.to_string(),
            })
    }
}
