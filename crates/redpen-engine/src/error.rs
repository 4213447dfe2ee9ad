use redpen_guard::GuardError;
use redpen_history::HistoryError;
use redpen_review::TransitionError;
use redpen_types::{PaperId, TypeError, Version};

/// Errors produced by engine operations.
///
/// Every rejected request maps to exactly one variant; nothing is silently
/// dropped. [`EngineError::class`] gives the coarse taxonomy the outward
/// surface keys its responses on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    Validation(#[from] TypeError),

    #[error("invalid input: {0}")]
    InvalidField(&'static str),

    #[error(transparent)]
    Guard(#[from] GuardError),

    #[error("paper not found: {paper}")]
    NotFound { paper: PaperId },

    #[error("version {proposed} does not increase on current {current}")]
    VersionNotIncreasing { current: Version, proposed: Version },

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("history append failed: {0}")]
    History(#[from] HistoryError),

    #[error("persistence failure: {0}")]
    Persistence(&'static str),
}

/// Coarse error classes, one per response family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed request content. Not retried.
    InputValidation,
    /// No actor identity. Not retried.
    Unauthenticated,
    /// Ownership/role mismatch. Never retried.
    Forbidden,
    /// Paper absent.
    NotFound,
    /// Version or status conflict; caller must resubmit corrected input.
    Conflict,
    /// Server-side persistence failure; rolled back.
    Persistence,
}

impl EngineError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) | Self::InvalidField(_) => ErrorClass::InputValidation,
            Self::Guard(GuardError::Unauthenticated) => ErrorClass::Unauthenticated,
            Self::Guard(_) => ErrorClass::Forbidden,
            Self::NotFound { .. } => ErrorClass::NotFound,
            Self::VersionNotIncreasing { .. } | Self::Transition(_) => ErrorClass::Conflict,
            Self::History(_) | Self::Persistence(_) => ErrorClass::Persistence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redpen_types::Role;

    #[test]
    fn classes_cover_the_taxonomy() {
        let cases: Vec<(EngineError, ErrorClass)> = vec![
            (
                EngineError::Validation(TypeError::InvalidVersionFormat("x".into())),
                ErrorClass::InputValidation,
            ),
            (
                EngineError::InvalidField("storage_key must be non-empty"),
                ErrorClass::InputValidation,
            ),
            (
                EngineError::Guard(GuardError::Unauthenticated),
                ErrorClass::Unauthenticated,
            ),
            (
                EngineError::Guard(GuardError::RoleRequired {
                    actor: 3,
                    role: Role::Student,
                }),
                ErrorClass::Forbidden,
            ),
            (
                EngineError::Guard(GuardError::Forbidden {
                    actor: 7,
                    action: "update",
                    paper: 1,
                }),
                ErrorClass::Forbidden,
            ),
            (EngineError::NotFound { paper: 9 }, ErrorClass::NotFound),
            (
                EngineError::VersionNotIncreasing {
                    current: Version::new(1, 1),
                    proposed: Version::new(1, 0),
                },
                ErrorClass::Conflict,
            ),
            (
                EngineError::Transition(TransitionError::AlreadyFinal),
                ErrorClass::Conflict,
            ),
            (
                EngineError::Persistence("paper table lock poisoned"),
                ErrorClass::Persistence,
            ),
        ];
        for (err, class) in cases {
            assert_eq!(err.class(), class, "{err}");
        }
    }
}
