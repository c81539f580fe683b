//! HTTP surface of the mail relay.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};

use super::client::RelayResponse;
use super::service::LeadDesk;
use super::validate::LeadSubmission;
use crate::error::RelayError;

/// Shared state for relay routes.
#[derive(Clone)]
pub struct RelayRouteState {
    pub desk: Arc<LeadDesk>,
}

/// POST /send_email
///
/// Accepts the six lead fields as JSON. Responds 200 on capture and 400 when
/// name or email fails validation.
async fn send_email(State(state): State<RelayRouteState>, body: Bytes) -> impl IntoResponse {
    let submission = LeadSubmission::from_body(&body);
    match state.desk.capture(submission).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(e) => (relay_status(&e), Json(RelayResponse::rejected(e.user_message()))),
    }
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "portfolio-leads"
    }))
}

pub(crate) fn relay_status(err: &RelayError) -> StatusCode {
    match err {
        RelayError::Invalid(_) => StatusCode::BAD_REQUEST,
        RelayError::Rejected { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        RelayError::Transport(_) | RelayError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Cross-origin policy matching what the site's static pages expect.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the relay routes.
pub fn relay_routes(state: RelayRouteState) -> Router {
    Router::new()
        .route("/send_email", post(send_email))
        .route("/send_email.php", post(send_email))
        .route("/api/leads", post(send_email))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors_layer())
}
