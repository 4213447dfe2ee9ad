use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::paper::UserId;

/// Closed set of roles an actor can hold.
///
/// Upstream identity providers hand us ad hoc role strings (mixed case,
/// plural forms, bilingual synonyms). Those are normalized exactly once at
/// the boundary via [`Role::parse`]; everything past the boundary compares
/// enum variants only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    /// Normalize a raw role string into the closed set.
    ///
    /// Case-folded, surrounding whitespace stripped, trailing plural `s`
    /// stripped, and the bilingual synonyms the upstream systems emit are
    /// merged ("教师" ≡ "teacher", "学生" ≡ "student", "管理员" ≡ "admin").
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let folded = raw.trim().to_lowercase();
        let singular = folded.strip_suffix('s').unwrap_or(&folded);
        match singular {
            "student" | "学生" => Ok(Self::Student),
            "teacher" | "教师" | "老师" => Ok(Self::Teacher),
            "admin" | "administrator" | "管理员" => Ok(Self::Admin),
            _ => Err(TypeError::UnknownRole(raw.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Teacher => write!(f, "teacher"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// A resolved, authenticated identity performing an operation.
///
/// Construction happens only in redpen-guard, which rejects unauthenticated
/// callers (`id <= 0`) and normalizes the role set before an `Actor` ever
/// reaches the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub name: String,
    pub roles: Vec<Role>,
}

impl Actor {
    pub fn new(id: UserId, name: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            id,
            name: name.into(),
            roles,
        }
    }

    /// Returns `true` if the actor holds the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns `true` if the actor holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
