pub mod health;
pub mod progress;

use std::sync::Arc;

use axum::http::Uri;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::state::AppState;

/// Build the Axum router with all API routes, CORS, and tracing middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    // The browser game is served from another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let progress_routes = Router::new()
        .route("/", post(progress::save_progress))
        .route("/:player_name", get(progress::get_progress));

    Router::new()
        .route("/api/health", get(health::health_check))
        .nest("/api/progress", progress_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
