use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actor::Role;
use crate::status::PaperStatus;
use crate::temporal::Timestamp;
use crate::version::Version;

/// Identifier of a paper lineage (one row in the paper table).
pub type PaperId = i64;

/// Identifier of a user. `0` means unauthenticated and never reaches the
/// engine.
pub type UserId = i64;

/// Unique identifier for a history row (UUID v7 for time-ordering).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(uuid::Uuid);

impl EntryId {
    /// Generate a new time-ordered entry ID (UUID v7).
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Short representation (first 8 characters of the UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.short_id())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Origin of a paper's first upload, carried verbatim onto every snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submitter {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

/// The mutable paper record: one row per document lineage.
///
/// Exclusively owned by the lifecycle engine. Callers observe it only
/// through the engine's operations; nothing outside the engine mutates a
/// `Paper`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub id: PaperId,
    pub owner_id: UserId,
    pub teacher_id: UserId,
    pub version: Version,
    pub status: PaperStatus,
    /// Set once by the owner opening the review cycle; never cleared.
    /// Explicit so it survives retried or backfilled history rows.
    pub review_started: bool,
    pub storage_key: String,
    pub size: u64,
    /// Free-text review note attached by the last status change.
    pub detail: Option<String>,
    pub submitted_by: Submitter,
    pub operated_by: UserId,
    pub operated_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An immutable audit snapshot, one per accepted mutation.
///
/// Created inside the same critical section that commits the paper row,
/// never altered afterward, removed only as a cascade of paper deletion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperHistory {
    pub entry_id: EntryId,
    pub paper_id: PaperId,
    pub version: Version,
    pub size: u64,
    pub status: PaperStatus,
    pub detail: Option<String>,
    pub storage_key: String,
    pub submitted_by: Submitter,
    pub operated_by: UserId,
    pub created_at: Timestamp,
}

impl PaperHistory {
    /// Snapshot the post-mutation state of a paper.
    ///
    /// `created_at` mirrors the paper's `updated_at`, which the engine sets
    /// from its monotonic clock for every accepted mutation.
    pub fn snapshot(paper: &Paper) -> Self {
        Self {
            entry_id: EntryId::new(),
            paper_id: paper.id,
            version: paper.version,
            size: paper.size,
            status: paper.status,
            detail: paper.detail.clone(),
            storage_key: paper.storage_key.clone(),
            submitted_by: paper.submitted_by.clone(),
            operated_by: paper.operated_by,
            created_at: paper.updated_at,
        }
    }
}
