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

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Generation
        .route(
            "/classes/{class_id}/timetable/generate",
            post(handlers::generate_timetable),
        )
        // Conflicts
        .route(
            "/timetables/{schedule_id}/conflicts",
            get(handlers::get_conflicts),
        )
        .route(
            "/timetables/{schedule_id}/resolve-conflicts",
            post(handlers::resolve_conflicts),
        )
        .route(
            "/teachers/{teacher_id}/conflict-check",
            get(handlers::check_teacher_conflict),
        )
        // Manual edits
        .route(
            "/timetables/{schedule_id}/swap-slots",
            post(handlers::swap_slots),
        )
        // Statistics and suggestions
        .route(
            "/timetables/{schedule_id}/statistics",
            get(handlers::get_statistics),
        )
        .route(
            "/classes/{class_id}/available-teachers",
            get(handlers::get_available_teachers),
        )
        .route(
            "/classes/{class_id}/suggestions",
            get(handlers::get_suggestions),
        );

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
