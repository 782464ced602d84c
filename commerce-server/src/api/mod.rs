//! API routing module
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`attributes`] / [`attribute_values`] / [`attribute_sets`] - attribute management
//! - [`products`] - product CRUD, attribute values, faceted search
//! - [`product_variants`] - variant CRUD and generation
//! - [`categories`] - category tree
//! - [`orders`] / [`stores`] / [`users`] - commerce entities
//! - [`storage`] - file directories, uploads and grants
//! - [`translations`] - translation CRUD and cache control

pub mod health;

pub mod attribute_sets;
pub mod attribute_values;
pub mod attributes;
pub mod categories;
pub mod orders;
pub mod product_variants;
pub mod products;
pub mod storage;
pub mod stores;
pub mod translations;
pub mod users;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};

/// Assemble the full application router
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(attributes::router())
        .merge(attribute_values::router())
        .merge(attribute_sets::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(product_variants::router())
        .merge(orders::router())
        .merge(stores::router())
        .merge(users::router())
        .merge(storage::router())
        .merge(translations::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
