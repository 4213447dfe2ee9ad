use redpen_types::{Actor, Paper, Role};

use crate::error::GuardError;
use crate::identity::IdentityContext;

/// Resolve an identity context into a normalized [`Actor`].
///
/// Fails `Unauthenticated` when the id is not positive. Role strings are
/// normalized through [`Role::parse`]; strings no variant recognizes are
/// dropped (upstream systems attach all sorts of labels), but an actor
/// with no recognizable role at all is rejected.
pub fn resolve_actor(ctx: &dyn IdentityContext) -> Result<Actor, GuardError> {
    let id = ctx.actor_id();
    if id <= 0 {
        return Err(GuardError::Unauthenticated);
    }

    let mut roles = Vec::new();
    for raw in ctx.actor_roles() {
        if let Ok(role) = Role::parse(raw) {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
    }
    if roles.is_empty() {
        return Err(GuardError::NoRecognizedRole { actor: id });
    }

    Ok(Actor::new(id, ctx.actor_name(), roles))
}

/// The actor must hold the given role (paper creation has no row yet to
/// bind ownership against, so the role itself is the requirement).
pub fn require_role(actor: &Actor, role: Role) -> Result<(), GuardError> {
    if actor.has_role(role) {
        return Ok(());
    }
    Err(GuardError::RoleRequired {
        actor: actor.id,
        role,
    })
}

/// The actor must be the paper's recorded owner.
pub fn require_owner(actor: &Actor, paper: &Paper, action: &'static str) -> Result<(), GuardError> {
    if actor.id == paper.owner_id {
        return Ok(());
    }
    Err(forbidden(actor, paper, action))
}

/// The actor must be the paper's recorded teacher.
pub fn require_teacher(
    actor: &Actor,
    paper: &Paper,
    action: &'static str,
) -> Result<(), GuardError> {
    if actor.id == paper.teacher_id {
        return Ok(());
    }
    Err(forbidden(actor, paper, action))
}

/// The actor must be the owner or hold the admin role (deletion).
pub fn require_owner_or_admin(
    actor: &Actor,
    paper: &Paper,
    action: &'static str,
) -> Result<(), GuardError> {
    if actor.id == paper.owner_id || actor.is_admin() {
        return Ok(());
    }
    Err(forbidden(actor, paper, action))
}

/// The actor must be owner, teacher, or admin (read paths).
pub fn require_participant(
    actor: &Actor,
    paper: &Paper,
    action: &'static str,
) -> Result<(), GuardError> {
    if actor.id == paper.owner_id || actor.id == paper.teacher_id || actor.is_admin() {
        return Ok(());
    }
    Err(forbidden(actor, paper, action))
}

/// The role this actor plays in the paper's review cycle.
///
/// The binding is the paper's recorded ids, not the actor's global role
/// set: the owner acts as Student, the recorded teacher as Teacher. Owner
/// wins if one account is both. Anyone else — admins included, the
/// transition table has no admin row — is forbidden.
pub fn review_role(actor: &Actor, paper: &Paper) -> Result<Role, GuardError> {
    if actor.id == paper.owner_id {
        Ok(Role::Student)
    } else if actor.id == paper.teacher_id {
        Ok(Role::Teacher)
    } else {
        Err(forbidden(actor, paper, "change the status of"))
    }
}

fn forbidden(actor: &Actor, paper: &Paper, action: &'static str) -> GuardError {
    GuardError::Forbidden {
        actor: actor.id,
        action,
        paper: paper.id,
    }
}
