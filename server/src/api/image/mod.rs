//! Image API module
//!
//! Serves stored menu images and holds the storage helpers used by the
//! menu handlers.

mod handler;
pub mod storage;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/image/{filename}", get(handler::serve))
}
