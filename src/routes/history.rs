use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::auth;
use crate::history::HistoryEntryView;
use crate::state::AppState;

use super::ApiError;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users/:user_id/history", get(get_history))
        .route(
            "/api/users/:user_id/history/:timestamp",
            get(get_message).delete(delete_message),
        )
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub user_id: String,
    pub history: Vec<HistoryEntryView>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub user_id: String,
    pub message: HistoryEntryView,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub status: &'static str,
}

#[instrument(skip(state, headers))]
pub async fn get_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<HistoryResponse>, ApiError> {
    require_key(&state, &user_id, &headers).await?;
    let history = state.store.list_active(&user_id).await?;
    Ok(Json(HistoryResponse { user_id, history }))
}

#[instrument(skip(state, headers))]
pub async fn get_message(
    State(state): State<AppState>,
    Path((user_id, timestamp)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ApiError> {
    require_key(&state, &user_id, &headers).await?;
    let message = state.store.get(&user_id, timestamp).await?;
    Ok(Json(MessageResponse { user_id, message }))
}

#[instrument(skip(state, headers))]
pub async fn delete_message(
    State(state): State<AppState>,
    Path((user_id, timestamp)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Result<Json<DeleteResponse>, ApiError> {
    require_key(&state, &user_id, &headers).await?;
    state.store.soft_delete(&user_id, timestamp).await?;
    Ok(Json(DeleteResponse { status: "success" }))
}

async fn require_key(
    state: &AppState,
    user_id: &str,
    headers: &HeaderMap,
) -> Result<(), ApiError> {
    let presented = headers.get("x-api-key").and_then(|v| v.to_str().ok());
    let allowed = auth::authorize(&state.store, user_id, presented)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    if allowed {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}
