pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route(
            "/api/v1/analysis",
            post(handlers::handle_analyze).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Jobs API
        .route(
            "/api/v1/jobs/recommendations",
            post(handlers::handle_recommend),
        )
        .route(
            "/api/v1/jobs/linkedin",
            get(handlers::handle_linkedin_search),
        )
        .with_state(state)
}
