//! Auth API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", auth_routes())
}

fn auth_routes() -> Router<ServerState> {
    Router::new()
        .route("/user/signup", post(handler::user_signup))
        .route("/user/login", post(handler::user_login))
        .route("/admin/signup", post(handler::admin_signup))
        .route("/admin/login", post(handler::admin_login))
        .route(
            "/users/all",
            get(handler::list_users).route_layer(middleware::from_fn(require_admin)),
        )
}
