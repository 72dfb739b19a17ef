use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::admin_recompute,
    compatibility::{get_album_compatibility, get_track_compatibility},
    groups::{get_group_analysis, get_group_coherence, get_group_track_analysis},
    rankings::get_global_rankings,
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/compatibility/:user_a/:user_b", get(get_album_compatibility))
        .route("/api/compatibility/:user_a/:user_b/album/:album_id", get(get_track_compatibility))
        .route("/api/global-rankings", get(get_global_rankings))
        .route("/api/groups/:group_id/coherence", get(get_group_coherence))
        .route("/api/groups/:group_id/analysis", get(get_group_analysis))
        .route("/api/groups/:group_id/analysis/album/:album_id", get(get_group_track_analysis))
        .route("/api/admin/recompute", post(admin_recompute))
        .with_state(state)
}
