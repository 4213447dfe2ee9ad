use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler;
use crate::state::AppState;

/// Build the axum router with all redpen endpoints.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route("/v1/health", get(handler::health))
        .route("/v1/info", get(handler::info))
        .route("/v1/papers", post(handler::create_paper))
        .route(
            "/v1/papers/:id",
            get(handler::get_paper)
                .put(handler::update_paper)
                .delete(handler::delete_paper),
        )
        .route("/v1/papers/:id/review", post(handler::create_review_status))
        .route("/v1/papers/:id/status", post(handler::change_status))
        .route("/v1/papers/:id/history", get(handler::list_history))
        .route("/v1/papers/:id/file", get(handler::download_paper))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes as usize))
        .layer(TraceLayer::new_for_http());

    if config.cors_allow_any {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}
