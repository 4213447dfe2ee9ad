use thiserror::Error;

/// Errors produced by blob storage operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlobError {
    #[error("blob not found: {key}")]
    NotFound { key: String },

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("filename must end in .docx: {0:?}")]
    UnsupportedFileType(String),

    #[error("upload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("empty upload")]
    Empty,

    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type BlobResult<T> = Result<T, BlobError>;
