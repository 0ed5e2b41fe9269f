//! Health check endpoint

use axum::{Json, Router, routing::get};
use serde::Serialize;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness check
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build health router (no state needed)
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}
