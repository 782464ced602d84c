//! Product variant API module
//!
//! Collection routes hang off the owning product; item routes are
//! addressed by variant id.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/products/{product_id}/variants", collection_routes())
        .nest("/api/variants", item_routes())
}

fn collection_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/generate", get(handler::generate))
}

fn item_routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/axis-values", get(handler::axis_values))
        .route(
            "/{id}/attribute-values",
            get(handler::get_attribute_values).put(handler::replace_attribute_values),
        )
}
