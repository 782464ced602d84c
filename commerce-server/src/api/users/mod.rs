//! User and role API module
//!
//! Responses use the legacy `{success, data, message}` envelope.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/users", user_routes())
        .nest("/api/roles", role_routes())
}

fn user_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/roles", get(handler::list_user_roles))
}

fn role_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_roles).post(handler::create_role))
        .route("/{id}", axum::routing::delete(handler::delete_role))
}
