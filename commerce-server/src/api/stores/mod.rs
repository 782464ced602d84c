//! Store API module
//!
//! Responses use the legacy `{success, data, message}` envelope.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stores", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/settings",
            get(handler::list_settings).put(handler::upsert_setting),
        )
        .route(
            "/{id}/settings/{key}",
            axum::routing::delete(handler::delete_setting),
        )
}
