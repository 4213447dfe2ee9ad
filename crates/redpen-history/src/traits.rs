use redpen_types::{PaperHistory, PaperId};

use crate::error::HistoryError;

/// Write boundary of the audit log: append, and only append.
///
/// Rows are immutable once written. Implementations must refuse a row
/// whose `created_at` is not strictly after the paper's latest row, so the
/// per-paper ordering stays total for any writer.
pub trait HistoryWriter: Send + Sync {
    fn append(&self, snapshot: PaperHistory) -> Result<PaperHistory, HistoryError>;
}

/// Read boundary of the audit log.
pub trait HistoryReader: Send + Sync {
    /// All rows for a paper, ordered by `created_at` descending.
    ///
    /// An unknown paper yields an empty list, not an error: "no history"
    /// and "never existed" are indistinguishable to the log.
    fn list(&self, paper_id: PaperId) -> Result<Vec<PaperHistory>, HistoryError>;

    /// Number of rows recorded for a paper.
    fn count(&self, paper_id: PaperId) -> Result<u64, HistoryError>;
}

/// Cascade boundary: rows leave the log only when their paper is deleted.
///
/// Kept separate from [`HistoryWriter`] so that components holding a
/// writer cannot delete anything; only the engine's delete path holds
/// this trait.
pub trait HistoryCascade: Send + Sync {
    /// Remove every row for a paper. Returns the number of rows removed.
    fn purge(&self, paper_id: PaperId) -> Result<u64, HistoryError>;
}
