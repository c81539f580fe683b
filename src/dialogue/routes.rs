//! REST endpoints for the chat widget.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::manager::DialogueManager;
use crate::error::DialogueError;

/// Shared state for chat routes.
#[derive(Clone)]
pub struct ChatRouteState {
    pub manager: Arc<DialogueManager>,
}

#[derive(Debug, Deserialize)]
struct SubmitBody {
    #[serde(default)]
    text: String,
}

fn not_found(err: DialogueError) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": err.to_string()})),
    )
        .into_response()
}

/// POST /api/chat/sessions
async fn open_session(State(state): State<ChatRouteState>) -> impl IntoResponse {
    let snapshot = state.manager.open().await;
    (StatusCode::CREATED, Json(snapshot))
}

/// GET /api/chat/sessions/{id}
async fn get_session(State(state): State<ChatRouteState>, Path(id): Path<Uuid>) -> Response {
    match state.manager.snapshot(id).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => not_found(e),
    }
}

/// POST /api/chat/sessions/{id}/messages
///
/// Body: `{"text": "..."}`. Returns the session and the lines this call added.
async fn post_message(
    State(state): State<ChatRouteState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SubmitBody>,
) -> Response {
    match state.manager.submit(id, &body.text).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => not_found(e),
    }
}

/// POST /api/chat/sessions/{id}/reset
async fn reset_session(State(state): State<ChatRouteState>, Path(id): Path<Uuid>) -> Response {
    match state.manager.reset(id).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => not_found(e),
    }
}

/// DELETE /api/chat/sessions/{id}
async fn close_session(State(state): State<ChatRouteState>, Path(id): Path<Uuid>) -> Response {
    if state.manager.close(id).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        not_found(DialogueError::SessionNotFound { id })
    }
}

/// Build the chat routes.
pub fn chat_routes(state: ChatRouteState) -> Router {
    Router::new()
        .route("/api/chat/sessions", post(open_session))
        .route(
            "/api/chat/sessions/{id}",
            get(get_session).delete(close_session),
        )
        .route("/api/chat/sessions/{id}/messages", post(post_message))
        .route("/api/chat/sessions/{id}/reset", post(reset_session))
        .with_state(state)
}
