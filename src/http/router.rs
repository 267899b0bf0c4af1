//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        // Rooms
        .route("/rooms/all", get(handlers::rooms_all))
        .route("/rooms/free", get(handlers::rooms_free))
        .route("/rooms/{room_id}", get(handlers::room_detail))
        .route("/rooms/{room_id}/checkin", post(handlers::checkin))
        // Analytics
        .route("/analytics/heatmap", get(handlers::heatmap))
        .route("/analytics/summary", get(handlers::summary))
        // Admin
        .route("/admin/load_csv", post(handlers::admin_load_csv))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
