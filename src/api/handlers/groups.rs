use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use crate::api::models::{CoherenceResponse, GroupAnalysisError, GroupAnalysisResponse};
use crate::database;
use crate::ranking::{GroupAnalysisOutcome, Scope};
use crate::services::GroupService;
use super::{query_error, AppState};

pub async fn get_group_coherence(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<i64>,
) -> impl IntoResponse {
    let service = GroupService::new(state.pool.clone(), state.config.compatibility.clone());

    let group = match service.find_group(group_id) {
        Ok(Some(group)) => group,
        Ok(None) => return (StatusCode::NOT_FOUND, format!("Group {} not found", group_id)).into_response(),
        Err(e) => return query_error(e),
    };

    match service.coherence(group_id) {
        Ok(coherence_percent) => Json(CoherenceResponse {
            group_id,
            group_name: group.name,
            coherence_percent,
        })
        .into_response(),
        Err(e) => query_error(e),
    }
}

pub async fn get_group_analysis(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<i64>,
) -> impl IntoResponse {
    group_analysis_response(&state, group_id, None)
}

pub async fn get_group_track_analysis(
    State(state): State<Arc<AppState>>,
    Path((group_id, album_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
    group_analysis_response(&state, group_id, Some(album_id))
}

fn group_analysis_response(state: &AppState, group_id: i64, album_id: Option<i64>) -> Response {
    let service = GroupService::new(state.pool.clone(), state.config.compatibility.clone());

    match service.find_group(group_id) {
        Ok(Some(_)) => {}
        Ok(None) => return (StatusCode::NOT_FOUND, format!("Group {} not found", group_id)).into_response(),
        Err(e) => return query_error(e),
    }
    if let Some(album_id) = album_id {
        match album_exists(state, album_id) {
            Ok(true) => {}
            Ok(false) => return (StatusCode::NOT_FOUND, format!("Album {} not found", album_id)).into_response(),
            Err(e) => return query_error(e),
        }
    }

    let scope = album_id.map_or(Scope::Albums, Scope::TracksOfAlbum);
    match service.analyze_group(group_id, scope) {
        Ok(GroupAnalysisOutcome::Analysis(analysis)) => {
            Json(GroupAnalysisResponse::new(group_id, scope, analysis)).into_response()
        }
        Ok(GroupAnalysisOutcome::TooFewMembers { member_count }) => (
            StatusCode::BAD_REQUEST,
            Json(GroupAnalysisError {
                error: format!("Group needs at least 2 members to compare, found {}", member_count),
                missing_users: Vec::new(),
            }),
        )
            .into_response(),
        Ok(GroupAnalysisOutcome::MissingRankings { usernames }) => (
            StatusCode::BAD_REQUEST,
            Json(GroupAnalysisError {
                error: "Some members have not submitted their rankings yet".to_string(),
                missing_users: usernames,
            }),
        )
            .into_response(),
        Err(e) => query_error(e),
    }
}

fn album_exists(state: &AppState, album_id: i64) -> anyhow::Result<bool> {
    let mut conn = database::get_connection(&state.pool)?;
    Ok(database::catalog::find_album_by_id(&mut conn, album_id)?.is_some())
}
