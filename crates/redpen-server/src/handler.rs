use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use redpen_blob::{validate_upload, StorageKey};
use redpen_engine::EngineError;
use redpen_types::{Paper, PaperHistory, PaperId, PaperStatus, UserId};

use crate::auth::{credentials_from_headers, Identity};
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateParams {
    pub teacher_id: UserId,
}

#[derive(Debug, Deserialize)]
pub struct UpdateParams {
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub target: String,
    pub detail: Option<String>,
}

/// Health check handler.
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Build info handler.
pub async fn info() -> Json<serde_json::Value> {
    Json(json!({
        "name": "redpen-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /v1/papers?teacher_id=` — upload a new paper.
///
/// The blob is stored before the engine transaction opens; if the engine
/// then rejects the request the blob stays behind as an orphan (accepted,
/// logged).
pub async fn create_paper(
    State(state): State<AppState>,
    Query(params): Query<CreateParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<(StatusCode, Json<Paper>)> {
    let identity = authenticate(&state, &headers).await?;
    let filename = filename_from(&headers)?;
    validate_upload(&filename, &body)?;

    let key = state.blobs.put(&filename, &body)?;
    let paper = state
        .engine
        .create_paper(&identity, params.teacher_id, &key.to_string(), body.len() as u64)
        .map_err(|e| orphaned(&key, e))?;
    Ok((StatusCode::CREATED, Json(paper)))
}

/// `PUT /v1/papers/{id}?version=` — upload a new version.
pub async fn update_paper(
    State(state): State<AppState>,
    Path(id): Path<PaperId>,
    Query(params): Query<UpdateParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Json<Paper>> {
    let identity = authenticate(&state, &headers).await?;
    let filename = filename_from(&headers)?;
    validate_upload(&filename, &body)?;

    let key = state.blobs.put(&filename, &body)?;
    let paper = state
        .engine
        .update_paper(&identity, id, &params.version, &key.to_string(), body.len() as u64)
        .map_err(|e| orphaned(&key, e))?;
    Ok(Json(paper))
}

/// `POST /v1/papers/{id}/review` — owner opens the review cycle.
pub async fn create_review_status(
    State(state): State<AppState>,
    Path(id): Path<PaperId>,
    headers: HeaderMap,
) -> ServerResult<Json<Paper>> {
    let identity = authenticate(&state, &headers).await?;
    let paper = state.engine.create_review_status(&identity, id)?;
    Ok(Json(paper))
}

/// `POST /v1/papers/{id}/status` — move the paper to an explicit status.
pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<PaperId>,
    headers: HeaderMap,
    Json(request): Json<ChangeStatusRequest>,
) -> ServerResult<Json<Paper>> {
    let identity = authenticate(&state, &headers).await?;
    let target: PaperStatus = request
        .target
        .parse()
        .map_err(|e| ServerError::Engine(EngineError::Validation(e)))?;
    let paper = state
        .engine
        .change_status(&identity, id, target, request.detail)?;
    Ok(Json(paper))
}

/// `GET /v1/papers/{id}` — fetch the paper record.
pub async fn get_paper(
    State(state): State<AppState>,
    Path(id): Path<PaperId>,
    headers: HeaderMap,
) -> ServerResult<Json<Paper>> {
    let identity = authenticate(&state, &headers).await?;
    Ok(Json(state.engine.get_paper(&identity, id)?))
}

/// `GET /v1/papers/{id}/history` — audit rows, newest first.
pub async fn list_history(
    State(state): State<AppState>,
    Path(id): Path<PaperId>,
    headers: HeaderMap,
) -> ServerResult<Json<Vec<PaperHistory>>> {
    let identity = authenticate(&state, &headers).await?;
    Ok(Json(state.engine.list_history(&identity, id)?))
}

/// `GET /v1/papers/{id}/file` — download the current document.
pub async fn download_paper(
    State(state): State<AppState>,
    Path(id): Path<PaperId>,
    headers: HeaderMap,
) -> ServerResult<Response> {
    let identity = authenticate(&state, &headers).await?;
    let paper = state.engine.get_paper(&identity, id)?;

    let key = StorageKey::parse(&paper.storage_key)
        .map_err(|e| ServerError::Internal(format!("stored key unparsable: {e}")))?;
    let blob = state.blobs.get(&key)?;

    let response_headers = [
        (
            header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", blob.filename),
        ),
    ];
    Ok((response_headers, blob.content).into_response())
}

/// `DELETE /v1/papers/{id}` — delete the paper and its history.
pub async fn delete_paper(
    State(state): State<AppState>,
    Path(id): Path<PaperId>,
    headers: HeaderMap,
) -> ServerResult<Json<serde_json::Value>> {
    let identity = authenticate(&state, &headers).await?;
    let purged = state.engine.delete_paper(&identity, id)?;
    Ok(Json(json!({ "deleted": id, "history_rows_purged": purged })))
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> ServerResult<Identity> {
    let credentials = credentials_from_headers(headers);
    state.auth.authenticate(&credentials).await
}

fn filename_from(headers: &HeaderMap) -> ServerResult<String> {
    headers
        .get("x-filename")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ServerError::BadRequest("missing x-filename header".to_string()))
}

fn orphaned(key: &StorageKey, err: EngineError) -> ServerError {
    warn!(key = %key, error = %err, "engine rejected upload; blob orphaned");
    ServerError::Engine(err)
}
