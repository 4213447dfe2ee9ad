use redpen_types::{PaperStatus, Role};

/// Errors produced by the status state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("paper is final; no further status mutation is permitted")]
    AlreadyFinal,

    #[error("{role} may not move a {current} paper to {target}")]
    InvalidTransition {
        current: PaperStatus,
        role: Role,
        target: PaperStatus,
    },

    #[error("review cycle has already been started for this paper")]
    ReviewAlreadyStarted,

    #[error("review can only be opened on an uploaded paper, not {current}")]
    NotAwaitingReview { current: PaperStatus },
}
