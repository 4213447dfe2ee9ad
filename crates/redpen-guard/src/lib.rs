//! Authorization guard for the redpen paper lifecycle.
//!
//! The guard sits between the outside world's identity (whatever the
//! gateway authenticated) and the engine's operations. It resolves an
//! [`IdentityContext`] into a normalized [`redpen_types::Actor`] exactly
//! once, then answers pure questions: is this actor the paper's owner, its
//! teacher, an admin?

pub mod error;
pub mod guard;
pub mod identity;

pub use error::GuardError;
pub use guard::{
    require_owner, require_owner_or_admin, require_participant, require_role, require_teacher,
    resolve_actor, review_role,
};
pub use identity::{IdentityContext, StaticIdentity};
