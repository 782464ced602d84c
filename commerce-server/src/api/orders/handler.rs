//! Order API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderDetail, OrderUpdate};
use crate::db::repository::OrderRepository;
use crate::utils::validation::{MAX_EMAIL_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub store_id: Option<i64>,
}

/// GET /api/orders?store_id=
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = match query.store_id {
        Some(store_id) => repo.find_by_store(store_id).await?,
        None => repo.find_all().await?,
    };
    Ok(Json(AppResponse::success(orders)))
}

/// GET /api/orders/:id - order with its items
pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let repo = OrderRepository::new(state.db.clone());
    let detail = repo
        .find_detail(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;
    Ok(Json(AppResponse::success(detail)))
}

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    validate_required_text(&payload.customer_email, "customer_email", MAX_EMAIL_LEN)?;

    let repo = OrderRepository::new(state.db.clone());
    let detail = repo.create(payload).await?;
    Ok(Json(AppResponse::success_with_message(
        detail,
        "Order created",
    )))
}

/// PUT /api/orders/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderUpdate>,
) -> AppResult<Json<AppResponse<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(repo.update(id, payload).await?)))
}

/// DELETE /api/orders/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = OrderRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Order {}", id)));
    }
    Ok(Json(AppResponse::success_with_message(true, "Order deleted")))
}
