//! Translation API module
//!
//! CRUD over languages, namespaces, keys and values, plus cache
//! control endpoints. Reads go through the TTL cache.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/translations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/languages",
            get(handler::list_languages).post(handler::create_language),
        )
        .route(
            "/languages/{id}",
            axum::routing::delete(handler::delete_language),
        )
        .route(
            "/namespaces",
            get(handler::list_namespaces).post(handler::create_namespace),
        )
        .route("/namespaces/{id}/keys", get(handler::list_keys))
        .route("/keys", post(handler::create_key))
        .route("/", post(handler::upsert))
        .route("/entry/{id}", axum::routing::delete(handler::delete_entry))
        .route("/cache/clear", post(handler::cache_clear))
        .route("/cache/warm-up", post(handler::cache_warm_up))
        .route("/cache/stats", get(handler::cache_stats))
        .route("/{language}/{namespace}", get(handler::get_entries))
}
