use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Live updates
        .route("/events", get(handlers::subscribe_events))
        // Recording control
        .route("/broadcast-record", post(handlers::broadcast_record))
        // Participant registry
        .route("/name-change", post(handlers::change_name))
        // Recording catalog
        .route("/files", get(handlers::list_files))
        .route("/upload", post(handlers::upload_recording))
        .route("/recordings/:key", get(handlers::get_recording))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
