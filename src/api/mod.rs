//! HTTP API module
//!
//! This module exposes the controls and the status view over HTTP.

pub mod handlers;
pub mod responses;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::tasks::ControlHandle;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(handle: ControlHandle) -> Router {
    Router::new()
        .route("/anti-sleep/start", post(anti_sleep_start_handler))
        .route("/anti-sleep/stop", post(anti_sleep_stop_handler))
        .route("/shutdown/schedule", post(shutdown_schedule_handler))
        .route("/shutdown/cancel", post(shutdown_cancel_handler))
        .route("/close", post(close_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(handle)
}
