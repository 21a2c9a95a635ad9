use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::status))

        // Documents
        .route("/index", post(handlers::index_docs))
        .route("/update", post(handlers::update_docs))
        .route("/delete", post(handlers::delete_docs))
        .route("/fill_embedding", post(handlers::fill_embedding))
        .route("/clear", post(handlers::clear_index))

        // Search
        .route("/search", post(handlers::search_docs))
        .route("/filter", post(handlers::filter_docs))

        .with_state(state)
}
