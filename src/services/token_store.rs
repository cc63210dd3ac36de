// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence for the single bearer-token record.
//!
//! Implementations only provide raw `read`/`write`/`remove`; the expiry
//! policy lives in the provided `load`, so every backend drops stale
//! records the same way.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::StoreError;
use crate::models::TokenRecord;
use crate::time_utils::now_epoch_ms;

pub trait TokenStore: Send + Sync {
    /// Raw read of whatever is persisted, valid or not.
    fn read(&self) -> Result<Option<TokenRecord>, StoreError>;

    /// Overwrite the persisted record.
    fn write(&self, record: &TokenRecord) -> Result<(), StoreError>;

    /// Remove the persisted record. Removing nothing is not an error.
    fn remove(&self) -> Result<(), StoreError>;

    /// Load a usable token, or `None` if absent or stale.
    fn load(&self) -> Result<Option<TokenRecord>, StoreError> {
        self.load_at(now_epoch_ms())
    }

    /// Like [`load`](Self::load) against an explicit clock. A stale record
    /// is cleared as a side effect.
    fn load_at(&self, now_ms: i64) -> Result<Option<TokenRecord>, StoreError> {
        match self.read()? {
            Some(record) if record.is_valid_at(now_ms) => Ok(Some(record)),
            Some(_) => {
                tracing::info!("Stored token expired, clearing");
                self.remove()?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn save(&self, record: &TokenRecord) -> Result<(), StoreError> {
        self.write(record)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.remove()
    }
}

/// Token record kept as a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self) -> Result<Option<TokenRecord>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write to a sibling temp file and rename over the target.
    fn write(&self, record: &TokenRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.temp_path();
        std::fs::write(&tmp, serde_json::to_vec_pretty(record)?)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "Token record saved");
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Token record removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store, for tests and hosts without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    record: Mutex<Option<TokenRecord>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: TokenRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self) -> Result<Option<TokenRecord>, StoreError> {
        Ok(self.record.lock().map_err(|_| StoreError::Poisoned)?.clone())
    }

    fn write(&self, record: &TokenRecord) -> Result<(), StoreError> {
        *self.record.lock().map_err(|_| StoreError::Poisoned)? = Some(record.clone());
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        *self.record.lock().map_err(|_| StoreError::Poisoned)? = None;
        Ok(())
    }
}
