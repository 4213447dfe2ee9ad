use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid version format: {0:?}")]
    InvalidVersionFormat(String),

    #[error("unknown status: {0:?}")]
    UnknownStatus(String),

    #[error("unknown role: {0:?}")]
    UnknownRole(String),
}
