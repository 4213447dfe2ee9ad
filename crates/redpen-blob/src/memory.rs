use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{BlobError, BlobResult};
use crate::key::StorageKey;
use crate::traits::{BlobStore, StoredBlob};

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. All blobs are held in memory behind a
/// `RwLock`; data is lost when the store is dropped.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<StorageKey, StoredBlob>>,
}

impl InMemoryBlobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(StoredBlob::size)
            .sum()
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put(&self, filename: &str, content: &[u8]) -> BlobResult<StorageKey> {
        let key = StorageKey::derive(filename, content);
        let mut map = self.blobs.write().expect("lock poisoned");
        // Idempotent: content-addressing guarantees an existing entry under
        // this key holds identical data.
        map.entry(key)
            .or_insert_with(|| StoredBlob::new(filename, content.to_vec()));
        Ok(key)
    }

    fn get(&self, key: &StorageKey) -> BlobResult<StoredBlob> {
        let map = self.blobs.read().expect("lock poisoned");
        map.get(key).cloned().ok_or_else(|| BlobError::NotFound {
            key: key.to_string(),
        })
    }

    fn exists(&self, key: &StorageKey) -> BlobResult<bool> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.contains_key(key))
    }

    fn delete(&self, key: &StorageKey) -> BlobResult<bool> {
        let mut map = self.blobs.write().expect("lock poisoned");
        Ok(map.remove(key).is_some())
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}
