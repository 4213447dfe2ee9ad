use redpen_types::{PaperId, Timestamp};

/// Errors produced by audit log operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("history row for paper {paper} at {at} is not after the latest row")]
    OutOfOrderTimestamp { paper: PaperId, at: Timestamp },

    #[error("history log lock poisoned")]
    LockPoisoned,
}
