//! Attribute value API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{AttributeValue, AttributeValueUpdate};
use crate::db::repository::AttributeRepository;
use crate::utils::{AppError, AppResult};

/// PUT /api/attribute-values/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AttributeValueUpdate>,
) -> AppResult<Json<AttributeValue>> {
    let repo = AttributeRepository::new(state.db.clone());
    Ok(Json(repo.update_value(id, payload).await?))
}

/// DELETE /api/attribute-values/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = AttributeRepository::new(state.db.clone());
    let deleted = repo.delete_value(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!(
            "Attribute value {}",
            id
        )));
    }
    Ok(Json(true))
}
