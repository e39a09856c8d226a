//! HTTP router setup.

use crate::handlers;
use crate::middleware;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create(state: Arc<AppState>) -> Router {
    Router::new()
        // Session routes sit behind the (optional) API key.
        .route("/session", get(handlers::session_view))
        .route("/session/connect", post(handlers::connect))
        .route("/session/disconnect", post(handlers::disconnect))
        .route("/session/mint", post(handlers::mint))
        .route_layer(axum::middleware::from_fn(middleware::api_key_auth))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(axum::middleware::from_fn(middleware::inject_request_id))
        .layer(TraceLayer::new_for_http())
        // The mint path waits for chain finality; everything else is fast.
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        // Browser single-page app is the only caller.
        .layer(CorsLayer::permissive())
        .with_state(state)
}
