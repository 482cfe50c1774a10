pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Screening API
        .route("/api/v1/screening/process", post(handlers::handle_process))
        .route(
            "/api/v1/screening/job-description",
            post(handlers::handle_generate_jd),
        )
        .route("/api/v1/screening/export", post(handlers::handle_export))
        .route(
            "/api/v1/screening/shortlist",
            post(handlers::handle_shortlist),
        )
        // Resume batches arrive as multipart PDF uploads.
        .layer(DefaultBodyLimit::max(25 * 1024 * 1024))
        .with_state(state)
}
