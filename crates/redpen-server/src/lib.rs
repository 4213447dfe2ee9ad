//! HTTP surface for the redpen paper lifecycle engine.
//!
//! Exposes the engine's operations over axum with gateway-forwarded
//! identity, maps the engine's error taxonomy onto HTTP statuses, and
//! serves paper content from the blob store.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use auth::{AuthProvider, Credentials, HeaderAuth, Identity};
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::RedpenServer;
pub use state::AppState;
