use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{CountryAggregateItem, GlobalRankingsResponse};
use crate::database::{self, DbCountryAggregate};
use super::{query_error, AppState};

pub async fn get_global_rankings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut conn = match database::get_connection(&state.pool) {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let aggregates = match database::aggregates::list_all(&mut conn) {
        Ok(rows) => rows,
        Err(e) => return query_error(e),
    };

    let items: Vec<CountryAggregateItem> = aggregates.into_iter().map(to_item).collect();
    Json(GlobalRankingsResponse {
        total: items.len(),
        items,
    })
    .into_response()
}

fn to_item(row: DbCountryAggregate) -> CountryAggregateItem {
    let analysis = serde_json::from_str(&row.analysis).unwrap_or_else(|e| {
        log::warn!("Stored analysis for {} is not valid JSON: {}", row.country_name, e);
        serde_json::Value::Null
    });

    CountryAggregateItem {
        country_name: row.country_name,
        user_count: row.user_count,
        consensus_album_id: row.consensus_album_id,
        polarization_album_id: row.polarization_album_id,
        global_consensus_track_id: row.global_consensus_track_id,
        analysis,
        calculated_at: row.calculated_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
    }
}
