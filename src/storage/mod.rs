//! Key/value persistence for gateway state.
//!
//! # Responsibilities
//! - Hold session flags, the connected-wallet flag, the upload cache and the
//!   user directory under fixed string keys
//! - Persist the whole map to a JSON file after every mutation
//!
//! # Design Decisions
//! - One shared map, last writer wins; no ordering between writers
//! - Saves are serialized and replace the file atomically (temp file + rename),
//!   so a reload always sees one complete snapshot
//! - An empty path keeps everything in memory (tests, throwaway sessions)

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub const IS_AUTHENTICATED_KEY: &str = "isAuthenticated";
pub const USER_SESSION_KEY: &str = "userSession";
pub const WALLET_CONNECTED_KEY: &str = "walletConnected";
pub const UPLOAD_CACHE_KEY: &str = "ipfs_upload_cache";
pub const REGISTERED_USERS_KEY: &str = "registeredUsers";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Shared JSON key/value store.
#[derive(Clone, Default)]
pub struct LocalStore {
    inner: Arc<DashMap<String, Value>>,
    path: Option<PathBuf>,
    save_lock: Arc<Mutex<()>>,
}

impl LocalStore {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the store at `path`, loading existing contents if the file exists.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();
        let store = Self {
            inner: Arc::new(DashMap::new()),
            path: Some(path.clone()),
            save_lock: Arc::new(Mutex::new(())),
        };
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            if !content.trim().is_empty() {
                let map: BTreeMap<String, Value> = serde_json::from_str(&content)?;
                for (k, v) in map {
                    store.inner.insert(k, v);
                }
            }
            tracing::info!(path = %path.display(), keys = store.inner.len(), "Loaded local storage");
        }
        Ok(store)
    }

    /// Open from configuration: empty path means in-memory.
    pub fn from_config(path: &str) -> StorageResult<Self> {
        if path.is_empty() {
            Ok(Self::in_memory())
        } else {
            Self::open(path)
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.inner.get(key)?.value().clone();
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "Ignoring malformed storage entry");
                None
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let value = serde_json::to_value(value)?;
        self.inner.insert(key.to_string(), value);
        self.save()
    }

    pub fn remove(&self, key: &str) -> StorageResult<()> {
        if self.inner.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    fn save(&self) -> StorageResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        // Snapshot under the lock so the last save written holds every earlier insert.
        let _guard = self.save_lock.lock();
        let map: BTreeMap<String, Value> = self
            .inner
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        let json = serde_json::to_string_pretty(&map)?;

        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("keys", &self.inner.len())
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_round_trip() {
        let store = LocalStore::in_memory();
        store.set(WALLET_CONNECTED_KEY, &"true").unwrap();
        assert_eq!(store.get::<String>(WALLET_CONNECTED_KEY).as_deref(), Some("true"));
        store.remove(WALLET_CONNECTED_KEY).unwrap();
        assert!(!store.contains(WALLET_CONNECTED_KEY));
    }

    #[test]
    fn test_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = LocalStore::open(&path).unwrap();
        store.set(IS_AUTHENTICATED_KEY, &"true").unwrap();
        store
            .set(UPLOAD_CACHE_KEY, &vec![("a-1-0".to_string(), "bafyA".to_string())])
            .unwrap();

        let reloaded = LocalStore::open(&path).unwrap();
        assert_eq!(reloaded.get::<String>(IS_AUTHENTICATED_KEY).as_deref(), Some("true"));
        let cache: Vec<(String, String)> = reloaded.get(UPLOAD_CACHE_KEY).unwrap();
        assert_eq!(cache[0].1, "bafyA");
    }

    #[test]
    fn test_malformed_entry_reads_as_missing() {
        let store = LocalStore::in_memory();
        store.set(REGISTERED_USERS_KEY, &42).unwrap();
        assert!(store.get::<Vec<String>>(REGISTERED_USERS_KEY).is_none());
    }

    #[test]
    fn test_concurrent_writers_leave_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        let store = LocalStore::open(&path).unwrap();

        let writers: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for round in 0..50 {
                        let key = format!("key-{}", t);
                        if round % 3 == 2 {
                            store.remove(&key).unwrap();
                        } else {
                            // Vary the length so a torn write would leave trailing bytes.
                            store.set(&key, &"x".repeat((round * 7 + t) % 40)).unwrap();
                        }
                    }
                    store.set(&format!("done-{}", t), &true).unwrap();
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let reloaded = LocalStore::open(&path).unwrap();
        for t in 0..8 {
            assert_eq!(reloaded.get::<bool>(&format!("done-{}", t)), Some(true));
        }
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(LocalStore::open(&path), Err(StorageError::Serde(_))));
    }
}
