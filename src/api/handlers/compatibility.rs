use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use crate::api::models::CompatibilityResponse;
use crate::database::{self, DbConn};
use crate::ranking::Scope;
use crate::services::compatibility::compare_users;
use super::{query_error, AppState};

pub async fn get_album_compatibility(
    State(state): State<Arc<AppState>>,
    Path((user_a, user_b)): Path<(i64, i64)>,
) -> impl IntoResponse {
    compatibility_response(&state, user_a, user_b, None)
}

pub async fn get_track_compatibility(
    State(state): State<Arc<AppState>>,
    Path((user_a, user_b, album_id)): Path<(i64, i64, i64)>,
) -> impl IntoResponse {
    compatibility_response(&state, user_a, user_b, Some(album_id))
}

fn compatibility_response(state: &AppState, user_a: i64, user_b: i64, album_id: Option<i64>) -> Response {
    let mut conn = match database::get_connection(&state.pool) {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };
    match first_missing_entity(&mut conn, user_a, user_b, album_id) {
        Ok(None) => {}
        Ok(Some(missing)) => return (StatusCode::NOT_FOUND, missing).into_response(),
        Err(e) => return query_error(e),
    }

    let scope = album_id.map_or(Scope::Albums, Scope::TracksOfAlbum);
    match compare_users(&mut conn, user_a, user_b, scope, &state.config.compatibility) {
        Ok(comparison) => Json(CompatibilityResponse::new(user_a, user_b, scope, &comparison)).into_response(),
        Err(e) => query_error(e),
    }
}

/// Not-found message for the first unknown user or album, if any.
fn first_missing_entity(
    conn: &mut DbConn,
    user_a: i64,
    user_b: i64,
    album_id: Option<i64>,
) -> anyhow::Result<Option<String>> {
    for user_id in [user_a, user_b] {
        if database::users::find_by_id(conn, user_id)?.is_none() {
            return Ok(Some(format!("User {} not found", user_id)));
        }
    }
    if let Some(album_id) = album_id {
        if database::catalog::find_album_by_id(conn, album_id)?.is_none() {
            return Ok(Some(format!("Album {} not found", album_id)));
        }
    }
    Ok(None)
}
