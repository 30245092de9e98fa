use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handler;
use crate::state::AppState;

/// Build the axum router with all registry endpoints.
///
/// `/api/resume/current` and `/api/resume/delete` are static segments and
/// take precedence over the `/api/resume/:version` capture.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/health", get(handler::health_handler))
        .route("/api/info", get(handler::info_handler))
        .route("/api/resume", post(handler::upload_handler))
        .route("/api/resume/current", get(handler::current_handler))
        .route("/api/resume/delete", delete(handler::delete_handler))
        .route("/api/resume/:version", get(handler::version_handler))
        .layer(DefaultBodyLimit::max(config.max_upload_size))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
