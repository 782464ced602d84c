//! Attribute value API module
//!
//! Mutations addressed by value id; creation and listing live under
//! the owning attribute's routes.

mod handler;

use axum::{Router, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attribute-values", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/{id}", put(handler::update).delete(handler::delete))
}
