//! Order API module
//!
//! Responses use the legacy `{success, data, message}` envelope.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
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
}
