//! Upload cache keyed by file fingerprint.
//!
//! Entries keep insertion order so pruning drops the oldest first. The list
//! is mirrored to local storage after every change.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::ipfs::types::FileUpload;
use crate::storage::{LocalStore, UPLOAD_CACHE_KEY};

/// Fingerprint of a file: name, size and modification time.
pub fn cache_key(file: &FileUpload) -> String {
    format!("{}-{}-{}", file.name, file.size(), file.modified_ms)
}

/// Ordered `key → CID` cache.
#[derive(Clone)]
pub struct UploadCache {
    entries: Arc<Mutex<Vec<(String, String)>>>,
    store: LocalStore,
}

impl UploadCache {
    /// Restore the cache from storage; a missing or malformed entry starts empty.
    pub fn load(store: LocalStore) -> Self {
        let entries: Vec<(String, String)> = store.get(UPLOAD_CACHE_KEY).unwrap_or_default();
        if !entries.is_empty() {
            tracing::debug!(entries = entries.len(), "Restored upload cache");
        }
        Self {
            entries: Arc::new(Mutex::new(entries)),
            store,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, cid)| cid.clone())
    }

    /// Record `cid` for `key`. An existing key keeps its position.
    pub fn insert(&self, key: String, cid: String) {
        {
            let mut entries = self.entries.lock();
            match entries.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = cid,
                None => entries.push((key, cid)),
            }
        }
        self.persist();
    }

    /// Drop the `batch` oldest entries once more than `capacity` are held.
    pub fn prune(&self, capacity: usize, batch: usize) -> usize {
        let removed = {
            let mut entries = self.entries.lock();
            if entries.len() <= capacity {
                return 0;
            }
            let n = batch.min(entries.len());
            entries.drain(..n);
            n
        };
        tracing::debug!(removed, "Pruned upload cache");
        self.persist();
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn persist(&self) {
        let snapshot = self.entries.lock().clone();
        if let Err(e) = self.store.set(UPLOAD_CACHE_KEY, &snapshot) {
            tracing::warn!(error = %e, "Failed to persist upload cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_uses_name_size_and_mtime() {
        let file = FileUpload::new("deed.pdf", "application/pdf", vec![0; 2048]).with_modified(1700000000000);
        assert_eq!(cache_key(&file), "deed.pdf-2048-1700000000000");
    }

    #[test]
    fn test_prune_drops_oldest_batch() {
        let cache = UploadCache::load(LocalStore::in_memory());
        for i in 0..51 {
            cache.insert(format!("k{}", i), format!("cid{}", i));
        }
        assert_eq!(cache.prune(50, 10), 10);
        assert_eq!(cache.len(), 41);
        assert!(cache.get("k9").is_none());
        assert_eq!(cache.get("k10").as_deref(), Some("cid10"));

        // At capacity nothing is removed.
        assert_eq!(cache.prune(50, 10), 0);
    }

    #[test]
    fn test_survives_reload() {
        let store = LocalStore::in_memory();
        let cache = UploadCache::load(store.clone());
        cache.insert("a-1-0".to_string(), "bafyA".to_string());
        cache.insert("a-1-0".to_string(), "bafyB".to_string());

        let reloaded = UploadCache::load(store);
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.get("a-1-0").as_deref(), Some("bafyB"));
    }
}
