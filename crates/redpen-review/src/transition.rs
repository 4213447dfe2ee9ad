use redpen_types::{PaperStatus, Role};

use crate::error::TransitionError;

use PaperStatus::*;

/// Statuses the given role may set next from `current`.
///
/// The empty slice means no transition is available: `Uploaded` papers only
/// leave their state through [`begin_review`], `Final` is terminal, and the
/// admin role has no row in the table at all — admins manage deletion, not
/// the review flow.
pub fn allowed_targets(current: PaperStatus, role: Role) -> &'static [PaperStatus] {
    match (current, role) {
        (PendingReview, Role::Student) => &[PendingReview],
        (PendingReview, Role::Teacher) => &[Reviewed, Final],
        (Reviewed, Role::Student) => &[Updated],
        (Reviewed, Role::Teacher) => &[Reviewed, Final],
        (Updated, Role::Student) => &[Updated],
        (Updated, Role::Teacher) => &[NeedsUpdate, Final],
        (NeedsUpdate, Role::Student) => &[Updated],
        (NeedsUpdate, Role::Teacher) => &[NeedsUpdate, Final],
        (Uploaded | Final, _) | (_, Role::Admin) => &[],
    }
}

/// Returns `true` if the transition table permits the move.
pub fn can_transition(current: PaperStatus, role: Role, target: PaperStatus) -> bool {
    allowed_targets(current, role).contains(&target)
}

/// Decide an explicit status change.
///
/// `AlreadyFinal` outranks `InvalidTransition`: once a paper is final the
/// caller learns that, not which target would otherwise have been illegal.
pub fn transition(
    current: PaperStatus,
    role: Role,
    target: PaperStatus,
) -> Result<PaperStatus, TransitionError> {
    if current.is_final() {
        return Err(TransitionError::AlreadyFinal);
    }
    if !can_transition(current, role, target) {
        return Err(TransitionError::InvalidTransition {
            current,
            role,
            target,
        });
    }
    Ok(target)
}

/// Decide the owner's request to open the review cycle.
///
/// Permitted only when the paper is exactly `Uploaded` and the cycle has
/// never been opened before; the flag is tracked explicitly on the paper
/// row rather than re-derived from history.
pub fn begin_review(
    current: PaperStatus,
    review_started: bool,
) -> Result<PaperStatus, TransitionError> {
    if current.is_final() {
        return Err(TransitionError::AlreadyFinal);
    }
    if review_started {
        return Err(TransitionError::ReviewAlreadyStarted);
    }
    if current != Uploaded {
        return Err(TransitionError::NotAwaitingReview { current });
    }
    Ok(PendingReview)
}
