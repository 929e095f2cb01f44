//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/providers", get(handlers::providers))
        .route("/templates", get(handlers::templates))
        // Provider calls
        .route("/search", post(handlers::search))
        .route("/analyze", post(handlers::analyze))
        .route("/scan", post(handlers::scan))
        .layer(cors)
        .with_state(state)
}
