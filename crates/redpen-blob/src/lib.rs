//! Blob storage boundary for redpen.
//!
//! Paper content lives outside the lifecycle engine, behind the
//! [`BlobStore`] trait. Keys are content-addressed (BLAKE3 over filename
//! and bytes), so `put` is idempotent and a stored blob can never change
//! under its key. Upload constraints that gate what may enter the store at
//! all (`.docx` only, 100 MiB cap) live here too, next to the boundary
//! they protect.

pub mod error;
pub mod key;
pub mod memory;
pub mod traits;
pub mod validate;

pub use error::{BlobError, BlobResult};
pub use key::StorageKey;
pub use memory::InMemoryBlobStore;
pub use traits::{BlobStore, StoredBlob};
pub use validate::{validate_upload, MAX_UPLOAD_BYTES};
