use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;

use super::AppState;

pub async fn admin_recompute(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let expected = format!("Bearer {}", state.config.admin_token);
    let auth_header = headers.get("Authorization").and_then(|h| h.to_str().ok());
    if auth_header != Some(expected.as_str()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    log::info!("Admin triggered global ranking recomputation");
    if state.queue.enqueue() {
        (StatusCode::ACCEPTED, "Recomputation queued").into_response()
    } else {
        (StatusCode::ACCEPTED, "Recomputation already pending").into_response()
    }
}
