mod routes;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::AppState;

/// Wildcard origin plus credentials is rejected by tower-http, so the
/// permissive policy mirrors the request origin instead.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::service_info))
        .route("/health", get(routes::health))
        .route("/api/video", get(routes::get_video).post(routes::post_video))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
