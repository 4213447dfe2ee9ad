use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BlobError;

/// Content-addressed storage key: `blob:<64 hex chars>`.
///
/// Derived from the uploaded filename and content with BLAKE3 under a
/// domain prefix, so the same upload always lands on the same key and two
/// different uploads never collide.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StorageKey([u8; 32]);

impl StorageKey {
    /// Derive the key for a named blob.
    pub fn derive(filename: &str, content: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"redpen-blob-v1:");
        hasher.update(filename.as_bytes());
        hasher.update(b":");
        hasher.update(content);
        Self(*hasher.finalize().as_bytes())
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse from the `blob:<hex>` string form.
    pub fn parse(s: &str) -> Result<Self, BlobError> {
        let hex_part = s
            .strip_prefix("blob:")
            .ok_or_else(|| BlobError::InvalidKey(s.to_string()))?;
        let bytes = hex::decode(hex_part).map_err(|_| BlobError::InvalidKey(s.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| BlobError::InvalidKey(s.to_string()))?;
        Ok(Self(arr))
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "blob:{}", hex::encode(self.0))
    }
}

impl fmt::Debug for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageKey(blob:{})", hex::encode(&self.0[..4]))
    }
}
