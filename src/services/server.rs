use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::settings::AppConfig;
use crate::database;
use crate::services::aggregation::AggregationService;
use crate::services::scheduler::RecomputeQueue;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let pool = database::create_pool(&self.config.database_path)?;
        {
            let mut conn = database::get_connection(&pool)?;
            database::setup::ensure_schema(&mut conn)?;
        }

        let aggregation = AggregationService::new(pool.clone(), self.config.aggregation.clone());
        let queue = RecomputeQueue::start(move || aggregation.recompute_global_rankings());

        let state = Arc::new(AppState::new(pool, self.config.clone(), queue));
        let app = create_router(state)
            .layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
