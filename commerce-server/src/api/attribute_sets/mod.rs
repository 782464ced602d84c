//! Attribute set API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attribute-sets", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_detail)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/attributes", get(handler::list_attributes).post(handler::assign))
        .route("/{id}/attributes/{attribute_id}", axum::routing::delete(handler::unassign))
}
