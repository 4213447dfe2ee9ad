use crate::error::{BlobError, BlobResult};

/// Upload size cap: 100 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Validate an upload before it reaches the store.
///
/// Papers are `.docx` documents (case-insensitive extension check) of at
/// most [`MAX_UPLOAD_BYTES`]; empty uploads are rejected outright.
pub fn validate_upload(filename: &str, content: &[u8]) -> BlobResult<()> {
    if !filename.to_lowercase().ends_with(".docx") {
        return Err(BlobError::UnsupportedFileType(filename.to_string()));
    }
    if content.is_empty() {
        return Err(BlobError::Empty);
    }
    let size = content.len() as u64;
    if size > MAX_UPLOAD_BYTES {
        return Err(BlobError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}
