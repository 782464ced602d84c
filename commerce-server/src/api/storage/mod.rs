//! File storage API module
//!
//! Directories, uploads (multipart), downloads and role grants.
//! Responses use the legacy `{success, data, message}` envelope except
//! for raw downloads.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/storage", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/directories",
            get(handler::list_directories).post(handler::create_directory),
        )
        .route(
            "/directories/{id}",
            axum::routing::delete(handler::delete_directory),
        )
        .route("/files", get(handler::list_files).post(handler::upload))
        .route(
            "/files/{id}",
            get(handler::download).delete(handler::delete_file),
        )
        .route("/files/{id}/meta", get(handler::file_meta))
        .route("/grants", post(handler::create_grant))
        .route("/grants/{entity_type}/{entity_id}", get(handler::list_grants))
        .route("/grants/{id}", axum::routing::delete(handler::delete_grant))
}
