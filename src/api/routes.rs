//! API route definitions

use super::graph_handlers;
use super::handlers::{self, ApiState};
use super::note_handlers;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // ====================================================================
        // Notes
        // ====================================================================
        .route(
            "/api/users/{user_id}/notes",
            get(note_handlers::list_notes).post(note_handlers::create_note),
        )
        .route(
            "/api/users/{user_id}/notes/{note_id}",
            get(note_handlers::get_note)
                .patch(note_handlers::update_note)
                .delete(note_handlers::delete_note),
        )
        .route(
            "/api/users/{user_id}/notes/{note_id}/links",
            get(note_handlers::get_note_links),
        )
        // ====================================================================
        // Links
        // ====================================================================
        .route(
            "/api/users/{user_id}/links",
            get(note_handlers::list_links).post(note_handlers::create_link),
        )
        .route(
            "/api/users/{user_id}/links/{link_id}",
            delete(note_handlers::delete_link),
        )
        // ====================================================================
        // Graph & analytics
        // ====================================================================
        .route("/api/users/{user_id}/graph", get(graph_handlers::get_graph))
        .route(
            "/api/users/{user_id}/graph/analytics",
            post(graph_handlers::run_analytics),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
