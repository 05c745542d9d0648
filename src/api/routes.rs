//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;
use crate::static_files;

/// Build the full router: client page, assets and the JSON endpoints
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Client page
        .route("/", get(static_files::index_handler))
        .route("/static/*path", get(static_files::asset_handler))
        // Health
        .route("/health", get(handlers::health_check))
        // Tickets
        .route("/preview-ticket", post(handlers::preview_ticket))
        .route("/create-ticket", post(handlers::create_ticket))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
