use async_trait::async_trait;
use axum::http::HeaderMap;

use redpen_guard::IdentityContext;

use crate::error::{ServerError, ServerResult};

/// Identity as the HTTP layer sees it: raw id, name, and role strings.
///
/// Implements [`IdentityContext`], so a resolved `Identity` can be handed
/// straight to the engine, which performs the actual authentication and
/// role normalization. An id of `0` is the anonymous identity.
#[derive(Clone, Debug)]
pub struct Identity {
    pub id: i64,
    pub name: String,
    pub roles: Vec<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            id: 0,
            name: String::new(),
            roles: Vec::new(),
        }
    }
}

impl IdentityContext for Identity {
    fn actor_id(&self) -> i64 {
        self.id
    }

    fn actor_name(&self) -> &str {
        &self.name
    }

    fn actor_roles(&self) -> &[String] {
        &self.roles
    }
}

/// Credentials extracted from a request.
#[derive(Clone, Debug)]
pub enum Credentials {
    /// Identity forwarded by a trusted gateway.
    Forwarded {
        id: String,
        name: String,
        roles: String,
    },
    Anonymous,
}

/// Pull credentials out of the request headers.
///
/// The gateway in front of this service authenticates the user and
/// forwards the verified identity in `x-actor-id`, `x-actor-name`, and
/// `x-actor-roles` (comma-separated). Requests without the id header are
/// anonymous.
pub fn credentials_from_headers(headers: &HeaderMap) -> Credentials {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    match header("x-actor-id") {
        Some(id) => Credentials::Forwarded {
            id,
            name: header("x-actor-name").unwrap_or_default(),
            roles: header("x-actor-roles").unwrap_or_default(),
        },
        None => Credentials::Anonymous,
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity>;
}

/// Default provider: trust the gateway's forwarded headers.
///
/// Rejects a malformed id outright; everything else (unauthenticated,
/// unknown roles, ownership) is the engine's call.
pub struct HeaderAuth;

#[async_trait]
impl AuthProvider for HeaderAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity> {
        match credentials {
            Credentials::Forwarded { id, name, roles } => {
                let id: i64 = id
                    .parse()
                    .map_err(|_| ServerError::AuthFailed(format!("malformed actor id: {id:?}")))?;
                Ok(Identity {
                    id,
                    name: name.clone(),
                    roles: roles
                        .split(',')
                        .map(str::trim)
                        .filter(|r| !r.is_empty())
                        .map(str::to_string)
                        .collect(),
                })
            }
            Credentials::Anonymous => Ok(Identity::anonymous()),
        }
    }
}
