use std::sync::Arc;

use redpen_blob::{BlobStore, InMemoryBlobStore};
use redpen_engine::PaperEngine;

use crate::auth::{AuthProvider, HeaderAuth};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PaperEngine>,
    pub blobs: Arc<dyn BlobStore>,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    pub fn new(
        engine: Arc<PaperEngine>,
        blobs: Arc<dyn BlobStore>,
        auth: Arc<dyn AuthProvider>,
    ) -> Self {
        Self {
            engine,
            blobs,
            auth,
        }
    }

    /// In-memory state with the default header-based auth provider.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(PaperEngine::new()),
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(HeaderAuth),
        )
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("engine", &self.engine)
            .finish()
    }
}
