//! Health check route
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /health | GET | none |

use std::time::Instant;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// ok | error
    status: &'static str,
    version: &'static str,
    database: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    status: &'static str,
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// GET /health - liveness plus a database round trip
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let start = Instant::now();
    let database = match state.db.query("RETURN 1").await {
        Ok(_) => CheckResult {
            status: "ok",
            latency_ms: Some(start.elapsed().as_millis() as u64),
            message: None,
        },
        Err(e) => CheckResult {
            status: "error",
            latency_ms: None,
            message: Some(e.to_string()),
        },
    };

    Json(HealthResponse {
        status: if database.status == "ok" { "ok" } else { "error" },
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
