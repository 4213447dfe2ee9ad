use redpen_types::{PaperId, Role, UserId};
use thiserror::Error;

/// Errors produced by actor resolution and ownership checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("unauthenticated: no actor identity supplied")]
    Unauthenticated,

    #[error("actor {actor} holds no recognized role")]
    NoRecognizedRole { actor: UserId },

    #[error("actor {actor} does not hold the {role} role")]
    RoleRequired { actor: UserId, role: Role },

    #[error("actor {actor} may not {action} paper {paper}")]
    Forbidden {
        actor: UserId,
        action: &'static str,
        paper: PaperId,
    },
}
