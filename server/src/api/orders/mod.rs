//! Orders API module

mod analytics;
mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    // Dashboard endpoints are staff-only; placement and self-reads only
    // need a valid user token
    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/today-count", get(handler::today_count))
        .route("/stats", get(handler::stats))
        .route("/analytics", get(handler::analytics))
        .route("/{id}/status", patch(handler::update_status))
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/", post(handler::create))
        .route("/recent", get(handler::recent))
        .route("/user/{user_id}", get(handler::list_for_user))
        .route("/{id}", get(handler::get_by_id))
        .merge(admin_routes)
}
