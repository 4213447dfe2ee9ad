use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Review-cycle status of a paper.
///
/// A paper starts `Uploaded`. The owner opens the review cycle
/// (`PendingReview`), after which owner and teacher move the paper through
/// the transition table in redpen-review. `Final` is absorbing: no status
/// mutation of any kind succeeds once it is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperStatus {
    /// Fresh upload; no review cycle started yet.
    Uploaded,
    /// Waiting for the teacher's review.
    PendingReview,
    /// Teacher has reviewed this version.
    Reviewed,
    /// Student uploaded or marked a revision.
    Updated,
    /// Teacher requests further changes.
    NeedsUpdate,
    /// Terminal: the paper is accepted as final.
    Final,
}

impl PaperStatus {
    /// Returns `true` for the terminal status.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Final)
    }

    /// All states, in lifecycle order. Used by exhaustive table tests.
    pub const ALL: [PaperStatus; 6] = [
        Self::Uploaded,
        Self::PendingReview,
        Self::Reviewed,
        Self::Updated,
        Self::NeedsUpdate,
        Self::Final,
    ];
}

impl fmt::Display for PaperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uploaded => "uploaded",
            Self::PendingReview => "pending_review",
            Self::Reviewed => "reviewed",
            Self::Updated => "updated",
            Self::NeedsUpdate => "needs_update",
            Self::Final => "final",
        };
        write!(f, "{s}")
    }
}

impl FromStr for PaperStatus {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uploaded" => Ok(Self::Uploaded),
            "pending_review" => Ok(Self::PendingReview),
            "reviewed" => Ok(Self::Reviewed),
            "updated" => Ok(Self::Updated),
            "needs_update" => Ok(Self::NeedsUpdate),
            "final" => Ok(Self::Final),
            _ => Err(TypeError::UnknownStatus(s.to_string())),
        }
    }
}
