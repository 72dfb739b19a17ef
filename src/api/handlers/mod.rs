use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::config::settings::AppConfig;
use crate::database::DbPool;
use crate::services::scheduler::RecomputeQueue;

pub mod admin;
pub mod compatibility;
pub mod groups;
pub mod rankings;

pub struct AppState {
    pub pool: DbPool,
    pub config: AppConfig,
    pub queue: RecomputeQueue,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig, queue: RecomputeQueue) -> Self {
        Self { pool, config, queue }
    }
}

fn query_error(e: anyhow::Error) -> Response {
    log::error!("Request failed: {:#}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response()
}
