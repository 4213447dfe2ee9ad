use std::collections::HashMap;
use std::sync::RwLock;

use redpen_types::{PaperHistory, PaperId};
use tracing::debug;

use crate::error::HistoryError;
use crate::traits::{HistoryCascade, HistoryReader, HistoryWriter};

/// In-memory audit log for tests, local demos, and embedding.
///
/// Rows are kept per paper in ascending `created_at` order (the append
/// order, by construction) and reversed on [`HistoryReader::list`].
pub struct InMemoryAuditLog {
    inner: RwLock<HashMap<PaperId, Vec<PaperHistory>>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Total rows across all papers.
    pub fn total_rows(&self) -> usize {
        self.inner
            .read()
            .map(|rows| rows.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

impl Default for InMemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryWriter for InMemoryAuditLog {
    fn append(&self, snapshot: PaperHistory) -> Result<PaperHistory, HistoryError> {
        let mut rows = self.inner.write().map_err(|_| HistoryError::LockPoisoned)?;
        let stream = rows.entry(snapshot.paper_id).or_default();

        if let Some(last) = stream.last() {
            if snapshot.created_at <= last.created_at {
                return Err(HistoryError::OutOfOrderTimestamp {
                    paper: snapshot.paper_id,
                    at: snapshot.created_at,
                });
            }
        }

        stream.push(snapshot.clone());
        Ok(snapshot)
    }
}

impl HistoryReader for InMemoryAuditLog {
    fn list(&self, paper_id: PaperId) -> Result<Vec<PaperHistory>, HistoryError> {
        let rows = self.inner.read().map_err(|_| HistoryError::LockPoisoned)?;
        let mut stream = rows.get(&paper_id).cloned().unwrap_or_default();
        stream.reverse();
        Ok(stream)
    }

    fn count(&self, paper_id: PaperId) -> Result<u64, HistoryError> {
        let rows = self.inner.read().map_err(|_| HistoryError::LockPoisoned)?;
        Ok(rows.get(&paper_id).map(|s| s.len() as u64).unwrap_or(0))
    }
}

impl HistoryCascade for InMemoryAuditLog {
    fn purge(&self, paper_id: PaperId) -> Result<u64, HistoryError> {
        let mut rows = self.inner.write().map_err(|_| HistoryError::LockPoisoned)?;
        let removed = rows.remove(&paper_id).map(|s| s.len() as u64).unwrap_or(0);
        debug!(paper_id, removed, "purged history for deleted paper");
        Ok(removed)
    }
}

impl std::fmt::Debug for InMemoryAuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryAuditLog")
            .field("total_rows", &self.total_rows())
            .finish()
    }
}
