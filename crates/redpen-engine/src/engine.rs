use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use tracing::info;

use redpen_guard::{
    require_owner, require_owner_or_admin, require_participant, require_role, resolve_actor,
    review_role, IdentityContext,
};
use redpen_history::{HistoryCascade, HistoryReader, HistoryWriter, InMemoryAuditLog};
use redpen_review::{begin_review, transition};
use redpen_types::{
    MonotonicClock, Paper, PaperHistory, PaperId, PaperStatus, Role, Submitter, Timestamp, UserId,
    Version,
};

use crate::error::EngineError;

/// The paper record store.
///
/// Owns every mutable `Paper` row and the audit log. Locking discipline:
///
/// - A mutation holds the table read lock for its whole duration and the
///   row's own `Mutex` across read-validate-write. Two mutations of the
///   same paper therefore serialize; the loser re-validates against the
///   winner's committed state instead of overwriting it.
/// - `create_paper` and `delete_paper` take the table write lock, so a
///   row being deleted can never be concurrently committed to.
/// - The history row is appended while the row lock is held, before the
///   new row state is published. An append failure aborts the mutation
///   with nothing written.
pub struct PaperEngine {
    table: RwLock<PaperTable>,
    audit: InMemoryAuditLog,
    clock: MonotonicClock,
}

struct PaperTable {
    rows: HashMap<PaperId, Arc<Mutex<Paper>>>,
    next_id: PaperId,
}

impl PaperEngine {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(PaperTable {
                rows: HashMap::new(),
                next_id: 1,
            }),
            audit: InMemoryAuditLog::new(),
            clock: MonotonicClock::new(),
        }
    }

    /// Number of live papers.
    pub fn paper_count(&self) -> usize {
        self.table.read().map(|t| t.rows.len()).unwrap_or(0)
    }

    /// Insert a new paper for the acting student.
    ///
    /// The blob is already uploaded by the time this runs; the engine only
    /// records its key and size. Starts at version `v1.0`, status
    /// `Uploaded`, with the review cycle not yet opened.
    pub fn create_paper(
        &self,
        ctx: &dyn IdentityContext,
        teacher_id: UserId,
        storage_key: &str,
        size: u64,
    ) -> Result<Paper, EngineError> {
        let actor = resolve_actor(ctx)?;
        require_role(&actor, Role::Student)?;
        if teacher_id <= 0 {
            return Err(EngineError::InvalidField("teacher_id must be positive"));
        }
        if storage_key.is_empty() {
            return Err(EngineError::InvalidField("storage_key must be non-empty"));
        }

        let mut table = self
            .table
            .write()
            .map_err(|_| EngineError::Persistence("paper table lock poisoned"))?;

        let now = self.clock.tick();
        let paper = Paper {
            id: table.next_id,
            owner_id: actor.id,
            teacher_id,
            version: Version::INITIAL,
            status: PaperStatus::Uploaded,
            review_started: false,
            storage_key: storage_key.to_string(),
            size,
            detail: None,
            submitted_by: Submitter {
                id: actor.id,
                name: actor.name.clone(),
                role: Role::Student,
            },
            operated_by: actor.id,
            operated_at: now,
            created_at: now,
            updated_at: now,
        };

        // History first: if the append fails, no row was inserted.
        self.audit.append(PaperHistory::snapshot(&paper))?;
        table.next_id += 1;
        table.rows.insert(paper.id, Arc::new(Mutex::new(paper.clone())));

        info!(paper = paper.id, owner = paper.owner_id, "paper created");
        Ok(paper)
    }

    /// Replace a paper's content with a strictly newer version.
    pub fn update_paper(
        &self,
        ctx: &dyn IdentityContext,
        paper_id: PaperId,
        new_version: &str,
        storage_key: &str,
        size: u64,
    ) -> Result<Paper, EngineError> {
        let actor = resolve_actor(ctx)?;
        if storage_key.is_empty() {
            return Err(EngineError::InvalidField("storage_key must be non-empty"));
        }

        self.mutate(paper_id, "updated", |paper, now| {
            require_owner(&actor, paper, "update")?;
            if paper.status.is_final() {
                return Err(redpen_review::TransitionError::AlreadyFinal.into());
            }

            let proposed = Version::parse(new_version)?;
            if !proposed.is_newer_than(&paper.version) {
                return Err(EngineError::VersionNotIncreasing {
                    current: paper.version,
                    proposed,
                });
            }

            let mut next = paper.clone();
            next.version = proposed;
            next.status = PaperStatus::Updated;
            next.storage_key = storage_key.to_string();
            next.size = size;
            next.operated_by = actor.id;
            next.operated_at = now;
            next.updated_at = now;
            Ok(next)
        })
    }

    /// Open the review cycle (owner only, exactly once, from `Uploaded`).
    pub fn create_review_status(
        &self,
        ctx: &dyn IdentityContext,
        paper_id: PaperId,
    ) -> Result<Paper, EngineError> {
        let actor = resolve_actor(ctx)?;

        self.mutate(paper_id, "review opened", |paper, now| {
            require_owner(&actor, paper, "open review for")?;
            let status = begin_review(paper.status, paper.review_started)?;

            let mut next = paper.clone();
            next.status = status;
            next.review_started = true;
            next.operated_by = actor.id;
            next.operated_at = now;
            next.updated_at = now;
            Ok(next)
        })
    }

    /// Move a paper to an explicit target status.
    ///
    /// The acting role is the actor's relationship to this paper (owner →
    /// student row of the table, recorded teacher → teacher row). A
    /// provided `detail` replaces the stored review note; `None` keeps it.
    pub fn change_status(
        &self,
        ctx: &dyn IdentityContext,
        paper_id: PaperId,
        target: PaperStatus,
        detail: Option<String>,
    ) -> Result<Paper, EngineError> {
        let actor = resolve_actor(ctx)?;

        self.mutate(paper_id, "status changed", |paper, now| {
            let role = review_role(&actor, paper)?;
            let status = transition(paper.status, role, target)?;

            let mut next = paper.clone();
            next.status = status;
            if let Some(note) = &detail {
                next.detail = Some(note.clone());
            }
            next.operated_by = actor.id;
            next.operated_at = now;
            next.updated_at = now;
            Ok(next)
        })
    }

    /// Fetch a paper (owner, teacher, or admin).
    pub fn get_paper(
        &self,
        ctx: &dyn IdentityContext,
        paper_id: PaperId,
    ) -> Result<Paper, EngineError> {
        let actor = resolve_actor(ctx)?;
        let paper = self.read_row(paper_id)?;
        require_participant(&actor, &paper, "read")?;
        Ok(paper)
    }

    /// Audit rows for a paper, newest first (owner, teacher, or admin).
    pub fn list_history(
        &self,
        ctx: &dyn IdentityContext,
        paper_id: PaperId,
    ) -> Result<Vec<PaperHistory>, EngineError> {
        let actor = resolve_actor(ctx)?;
        let paper = self.read_row(paper_id)?;
        require_participant(&actor, &paper, "read the history of")?;
        Ok(self.audit.list(paper_id)?)
    }

    /// Delete a paper and cascade its history (owner or admin).
    ///
    /// Returns the number of history rows purged. The paper's blob is left
    /// behind; orphaned blobs are an accepted leak.
    pub fn delete_paper(
        &self,
        ctx: &dyn IdentityContext,
        paper_id: PaperId,
    ) -> Result<u64, EngineError> {
        let actor = resolve_actor(ctx)?;

        let mut table = self
            .table
            .write()
            .map_err(|_| EngineError::Persistence("paper table lock poisoned"))?;

        let row = table
            .rows
            .get(&paper_id)
            .ok_or(EngineError::NotFound { paper: paper_id })?;
        {
            let paper = row
                .lock()
                .map_err(|_| EngineError::Persistence("paper row lock poisoned"))?;
            require_owner_or_admin(&actor, &paper, "delete")?;
        }

        table.rows.remove(&paper_id);
        let purged = self.audit.purge(paper_id)?;
        info!(paper = paper_id, actor = actor.id, purged, "paper deleted");
        Ok(purged)
    }

    /// Run one transactional mutation against a paper row.
    ///
    /// Holds the table read lock for the duration and the row mutex across
    /// validate-append-commit. `build` sees the current committed state and
    /// returns the full next state; nothing is written if it fails, and
    /// nothing is written if the history append fails.
    fn mutate(
        &self,
        paper_id: PaperId,
        op: &'static str,
        build: impl FnOnce(&Paper, Timestamp) -> Result<Paper, EngineError>,
    ) -> Result<Paper, EngineError> {
        let table = self
            .table
            .read()
            .map_err(|_| EngineError::Persistence("paper table lock poisoned"))?;
        let row = table
            .rows
            .get(&paper_id)
            .cloned()
            .ok_or(EngineError::NotFound { paper: paper_id })?;

        let mut current = row
            .lock()
            .map_err(|_| EngineError::Persistence("paper row lock poisoned"))?;

        let next = build(&current, self.clock.tick())?;
        self.audit.append(PaperHistory::snapshot(&next))?;
        *current = next.clone();

        info!(
            paper = next.id,
            status = %next.status,
            version = %next.version,
            "{op}"
        );
        Ok(next)
    }

    fn read_row(&self, paper_id: PaperId) -> Result<Paper, EngineError> {
        let table = self
            .table
            .read()
            .map_err(|_| EngineError::Persistence("paper table lock poisoned"))?;
        let row = table
            .rows
            .get(&paper_id)
            .ok_or(EngineError::NotFound { paper: paper_id })?;
        let paper = row
            .lock()
            .map_err(|_| EngineError::Persistence("paper row lock poisoned"))?;
        Ok(paper.clone())
    }
}

impl Default for PaperEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PaperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaperEngine")
            .field("paper_count", &self.paper_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;
    use redpen_guard::{GuardError, StaticIdentity};
    use redpen_review::TransitionError;

    fn student(id: i64) -> StaticIdentity {
        StaticIdentity::new(id, format!("student-{id}"), &["student"])
    }

    fn teacher(id: i64) -> StaticIdentity {
        StaticIdentity::new(id, format!("teacher-{id}"), &["教师"])
    }

    fn admin(id: i64) -> StaticIdentity {
        StaticIdentity::new(id, "ops", &["admin"])
    }

    /// Create a paper owned by student 5 with teacher 9.
    fn engine_with_paper() -> (PaperEngine, PaperId) {
        let engine = PaperEngine::new();
        let paper = engine
            .create_paper(&student(5), 9, "blob:thesis", 1000)
            .unwrap();
        let id = paper.id;
        (engine, id)
    }

    #[test]
    fn create_paper_starts_at_v1_uploaded() {
        let (engine, id) = engine_with_paper();
        let paper = engine.get_paper(&student(5), id).unwrap();

        assert_eq!(paper.version, Version::parse("v1.0").unwrap());
        assert_eq!(paper.status, PaperStatus::Uploaded);
        assert!(!paper.review_started);
        assert_eq!(paper.owner_id, 5);
        assert_eq!(paper.teacher_id, 9);
        assert_eq!(paper.submitted_by.id, 5);
        assert_eq!(paper.submitted_by.role, Role::Student);

        let history = engine.list_history(&student(5), id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, PaperStatus::Uploaded);
    }

    #[test]
    fn create_paper_requires_an_authenticated_student() {
        let engine = PaperEngine::new();

        let err = engine
            .create_paper(&StaticIdentity::anonymous(), 9, "blob:k", 10)
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Unauthenticated);

        let err = engine.create_paper(&teacher(9), 9, "blob:k", 10).unwrap_err();
        assert_eq!(
            err,
            EngineError::Guard(GuardError::RoleRequired {
                actor: 9,
                role: Role::Student,
            })
        );
    }

    #[test]
    fn create_paper_validates_fields() {
        let engine = PaperEngine::new();
        assert_eq!(
            engine.create_paper(&student(5), 0, "blob:k", 10).unwrap_err().class(),
            ErrorClass::InputValidation
        );
        assert_eq!(
            engine.create_paper(&student(5), 9, "", 10).unwrap_err().class(),
            ErrorClass::InputValidation
        );
    }

    #[test]
    fn update_accepts_newer_and_rejects_older_or_equal_versions() {
        let (engine, id) = engine_with_paper();

        let paper = engine
            .update_paper(&student(5), id, "v1.1", "blob:thesis-2", 1100)
            .unwrap();
        assert_eq!(paper.version, Version::new(1, 1));
        assert_eq!(paper.status, PaperStatus::Updated);
        assert_eq!(paper.size, 1100);
        assert_eq!(engine.list_history(&student(5), id).unwrap().len(), 2);

        // No decrease.
        let err = engine
            .update_paper(&student(5), id, "v1.0", "blob:old", 1000)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::VersionNotIncreasing {
                current: Version::new(1, 1),
                proposed: Version::new(1, 0),
            }
        );

        // No repeat.
        let err = engine
            .update_paper(&student(5), id, "v1.1", "blob:same", 1100)
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Conflict);

        // Rejections leave no history behind.
        assert_eq!(engine.list_history(&student(5), id).unwrap().len(), 2);
    }

    #[test]
    fn update_rejects_malformed_versions_without_writing() {
        let (engine, id) = engine_with_paper();
        let err = engine
            .update_paper(&student(5), id, "one.two", "blob:x", 10)
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::InputValidation);
        assert_eq!(engine.list_history(&student(5), id).unwrap().len(), 1);
    }

    #[test]
    fn update_by_stranger_is_forbidden() {
        let (engine, id) = engine_with_paper();
        let err = engine
            .update_paper(&student(7), id, "v1.1", "blob:x", 10)
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Forbidden);
    }

    #[test]
    fn review_cycle_opens_once_and_only_for_the_owner() {
        let (engine, id) = engine_with_paper();

        let err = engine.create_review_status(&teacher(9), id).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Forbidden);

        let paper = engine.create_review_status(&student(5), id).unwrap();
        assert_eq!(paper.status, PaperStatus::PendingReview);
        assert!(paper.review_started);

        let err = engine.create_review_status(&student(5), id).unwrap_err();
        assert_eq!(
            err,
            EngineError::Transition(TransitionError::ReviewAlreadyStarted)
        );
        assert_eq!(engine.list_history(&student(5), id).unwrap().len(), 2);
    }

    #[test]
    fn full_review_lifecycle() {
        let (engine, id) = engine_with_paper();
        let owner = student(5);
        let reviewer = teacher(9);

        engine.create_review_status(&owner, id).unwrap();
        let p = engine
            .change_status(&reviewer, id, PaperStatus::Reviewed, Some("fix §2".into()))
            .unwrap();
        assert_eq!(p.status, PaperStatus::Reviewed);
        assert_eq!(p.detail.as_deref(), Some("fix §2"));

        let p = engine
            .change_status(&owner, id, PaperStatus::Updated, None)
            .unwrap();
        assert_eq!(p.status, PaperStatus::Updated);
        // Absent detail keeps the stored note.
        assert_eq!(p.detail.as_deref(), Some("fix §2"));

        let p = engine
            .change_status(&reviewer, id, PaperStatus::NeedsUpdate, Some("§3 too".into()))
            .unwrap();
        assert_eq!(p.status, PaperStatus::NeedsUpdate);

        engine
            .change_status(&owner, id, PaperStatus::Updated, None)
            .unwrap();
        let p = engine
            .change_status(&reviewer, id, PaperStatus::Final, None)
            .unwrap();
        assert_eq!(p.status, PaperStatus::Final);

        // 1 create + 1 review open + 5 status changes.
        let history = engine.list_history(&owner, id).unwrap();
        assert_eq!(history.len(), 7);
    }

    #[test]
    fn final_is_absorbing_for_every_operation_and_role() {
        let (engine, id) = engine_with_paper();
        engine.create_review_status(&student(5), id).unwrap();
        engine
            .change_status(&teacher(9), id, PaperStatus::Final, None)
            .unwrap();

        for target in PaperStatus::ALL {
            let err = engine
                .change_status(&student(5), id, target, None)
                .unwrap_err();
            assert_eq!(err, EngineError::Transition(TransitionError::AlreadyFinal));
            let err = engine
                .change_status(&teacher(9), id, target, None)
                .unwrap_err();
            assert_eq!(err, EngineError::Transition(TransitionError::AlreadyFinal));
        }

        let err = engine.create_review_status(&student(5), id).unwrap_err();
        assert_eq!(err, EngineError::Transition(TransitionError::AlreadyFinal));

        let err = engine
            .update_paper(&student(5), id, "v9.0", "blob:late", 10)
            .unwrap_err();
        assert_eq!(err, EngineError::Transition(TransitionError::AlreadyFinal));
    }

    #[test]
    fn change_status_rejects_illegal_targets_and_strangers() {
        let (engine, id) = engine_with_paper();
        engine.create_review_status(&student(5), id).unwrap();

        // Students may not finalize.
        let err = engine
            .change_status(&student(5), id, PaperStatus::Final, None)
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Transition(TransitionError::InvalidTransition {
                current: PaperStatus::PendingReview,
                role: Role::Student,
                target: PaperStatus::Final,
            })
        );

        // Strangers (and admins) are not part of the review flow.
        let err = engine
            .change_status(&student(7), id, PaperStatus::Reviewed, None)
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Forbidden);
        let err = engine
            .change_status(&admin(100), id, PaperStatus::Reviewed, None)
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Forbidden);
    }

    #[test]
    fn every_accepted_mutation_snapshots_the_new_state() {
        let (engine, id) = engine_with_paper();

        let after_update = engine
            .update_paper(&student(5), id, "v1.1", "blob:v2", 1100)
            .unwrap();
        let history = engine.list_history(&student(5), id).unwrap();
        let newest = &history[0];
        assert_eq!(newest.version, after_update.version);
        assert_eq!(newest.size, after_update.size);
        assert_eq!(newest.status, after_update.status);
        assert_eq!(newest.storage_key, after_update.storage_key);
        assert_eq!(newest.operated_by, after_update.operated_by);
        assert_eq!(newest.created_at, after_update.updated_at);
    }

    #[test]
    fn history_is_descending_and_readable_by_participants_only() {
        let (engine, id) = engine_with_paper();
        engine
            .update_paper(&student(5), id, "v1.1", "blob:v2", 1100)
            .unwrap();
        engine.create_review_status(&student(5), id).unwrap();

        for ctx in [student(5), teacher(9), admin(100)] {
            let history = engine.list_history(&ctx, id).unwrap();
            assert_eq!(history.len(), 3);
            for pair in history.windows(2) {
                assert!(pair[0].created_at > pair[1].created_at);
            }
        }

        let err = engine.list_history(&student(7), id).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Forbidden);
    }

    #[test]
    fn get_paper_is_guarded() {
        let (engine, id) = engine_with_paper();
        assert!(engine.get_paper(&student(5), id).is_ok());
        assert!(engine.get_paper(&teacher(9), id).is_ok());
        assert!(engine.get_paper(&admin(100), id).is_ok());
        assert_eq!(
            engine.get_paper(&student(7), id).unwrap_err().class(),
            ErrorClass::Forbidden
        );
        assert_eq!(
            engine.get_paper(&student(5), 999).unwrap_err(),
            EngineError::NotFound { paper: 999 }
        );
    }

    #[test]
    fn delete_cascades_history_and_is_owner_or_admin_only() {
        let (engine, id) = engine_with_paper();
        engine
            .update_paper(&student(5), id, "v1.1", "blob:v2", 1100)
            .unwrap();

        let err = engine.delete_paper(&teacher(9), id).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Forbidden);

        assert_eq!(engine.delete_paper(&student(5), id).unwrap(), 2);
        assert_eq!(
            engine.get_paper(&student(5), id).unwrap_err(),
            EngineError::NotFound { paper: id }
        );
        assert_eq!(engine.paper_count(), 0);
    }

    #[test]
    fn admin_can_delete_without_owning() {
        let (engine, id) = engine_with_paper();
        assert_eq!(engine.delete_paper(&admin(100), id).unwrap(), 1);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let (engine, first) = engine_with_paper();
        engine.delete_paper(&student(5), first).unwrap();
        let second = engine
            .create_paper(&student(5), 9, "blob:again", 10)
            .unwrap();
        assert!(second.id > first);
    }

    #[test]
    fn concurrent_finalization_has_exactly_one_winner() {
        use std::thread;

        let (engine, id) = engine_with_paper();
        engine.create_review_status(&student(5), id).unwrap();

        let engine = Arc::new(engine);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    engine.change_status(&teacher(9), id, PaperStatus::Final, None)
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();

        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1, "exactly one finalization may commit");
        for result in results.iter().filter(|r| r.is_err()) {
            assert_eq!(
                result.clone().unwrap_err(),
                EngineError::Transition(TransitionError::AlreadyFinal)
            );
        }

        // create + review open + one committed finalization.
        let history = engine.list_history(&teacher(9), id).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].status, PaperStatus::Final);
    }

    #[test]
    fn concurrent_same_version_updates_do_not_both_commit() {
        use std::thread;

        let (engine, id) = engine_with_paper();
        let engine = Arc::new(engine);

        let handles: Vec<_> = (0..2u64)
            .map(|i| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    engine.update_paper(&student(5), id, "v1.1", "blob:racer", 10 + i)
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(EngineError::VersionNotIncreasing { .. })))
                .count(),
            1
        );
        assert_eq!(engine.list_history(&student(5), id).unwrap().len(), 2);
    }
}
