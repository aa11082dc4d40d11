//! Menu API module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, patch},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", menu_routes())
}

fn menu_routes() -> Router<ServerState> {
    // Catalog reads are public; every mutation sits behind the admin
    // gate
    let admin_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .route("/{id}/availability", patch(handler::set_availability))
        .route_layer(middleware::from_fn(require_admin));

    Router::new()
        .route("/", get(handler::list))
        .route("/specials", get(handler::specials))
        .route("/{id}", get(handler::get_by_id))
        .merge(admin_routes)
}
