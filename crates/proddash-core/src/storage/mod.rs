mod config;
pub mod database;
mod memory;

pub use config::{Config, NotificationsConfig, UiConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ConfigError, StorageError};

/// Returns the data directory, creating it if needed.
///
/// `PRODDASH_DATA_DIR` wins when set. Otherwise `~/.config/proddash`, or
/// `~/.config/proddash-dev` when `PRODDASH_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PRODDASH_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("PRODDASH_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("proddash-dev")
            } else {
                base_dir.join("proddash")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|source| ConfigError::DataDir {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}

/// String key-value storage backing the persisted blobs.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// JSON layer over a [`KvStore`].
///
/// Reads never fail: a missing key, an unreadable store or a blob that is
/// not valid JSON all come back as `None` so callers fall back to defaults.
/// Writes return the error, and the caller decides how to report it.
#[derive(Debug)]
pub struct StateStore<S> {
    inner: S,
}

impl<S: KvStore> StateStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    pub fn fetch(&self, key: &str) -> Option<Value> {
        let raw = match self.inner.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read persisted blob");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "persisted blob is not valid JSON");
                None
            }
        }
    }

    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)
            .map_err(|e| StorageError::QueryFailed(format!("serialize {key}: {e}")))?;
        self.inner.set(key, &json)?;
        tracing::debug!(key, "persisted blob");
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}
