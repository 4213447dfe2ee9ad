use serde::{Deserialize, Serialize};

use crate::error::BlobResult;
use crate::key::StorageKey;

/// A stored blob: the original filename plus its bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBlob {
    pub filename: String,
    pub content: Vec<u8>,
}

impl StoredBlob {
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Content-addressed blob store.
///
/// All implementations must satisfy these invariants:
/// - Blobs are immutable once written; the key is derived from the
///   filename and content, so the same upload always produces the same key.
/// - `put` is idempotent: re-uploading an identical blob is a no-op.
/// - Concurrent reads are always safe.
/// - The store never interprets blob contents.
/// - All backend errors are propagated, never silently ignored.
pub trait BlobStore: Send + Sync {
    /// Write a blob and return its content-addressed key.
    fn put(&self, filename: &str, content: &[u8]) -> BlobResult<StorageKey>;

    /// Read a blob by key. Fails `NotFound` if absent.
    fn get(&self, key: &StorageKey) -> BlobResult<StoredBlob>;

    /// Check whether a blob exists.
    fn exists(&self, key: &StorageKey) -> BlobResult<bool>;

    /// Delete a blob by key. Returns `true` if it existed.
    ///
    /// This is intended for orphan cleanup only; the engine never deletes
    /// blobs that a live paper row still references.
    fn delete(&self, key: &StorageKey) -> BlobResult<bool>;
}
