//! Attribute set API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{
    AssignmentCreate, Attribute, AttributeSet, AttributeSetAssignment, AttributeSetCreate,
    AttributeSetDetail, AttributeSetUpdate,
};
use crate::db::repository::AttributeSetRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};

/// GET /api/attribute-sets
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<AttributeSet>>> {
    let repo = AttributeSetRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/attribute-sets/:id - set with its member attributes
pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AttributeSetDetail>> {
    let repo = AttributeSetRepository::new(state.db.clone());
    let detail = repo
        .find_detail(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Attribute set {}", id)))?;
    Ok(Json(detail))
}

/// POST /api/attribute-sets
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AttributeSetCreate>,
) -> AppResult<Json<AttributeSet>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let repo = AttributeSetRepository::new(state.db.clone());
    Ok(Json(repo.create(payload).await?))
}

/// PUT /api/attribute-sets/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AttributeSetUpdate>,
) -> AppResult<Json<AttributeSet>> {
    let repo = AttributeSetRepository::new(state.db.clone());
    Ok(Json(repo.update(id, payload).await?))
}

/// DELETE /api/attribute-sets/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = AttributeSetRepository::new(state.db.clone());
    Ok(Json(repo.delete(id).await?))
}

/// GET /api/attribute-sets/:id/attributes
pub async fn list_attributes(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Attribute>>> {
    let repo = AttributeSetRepository::new(state.db.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "Attribute set {}",
            id
        )));
    }
    Ok(Json(repo.find_attributes(id).await?))
}

/// POST /api/attribute-sets/:id/attributes
pub async fn assign(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AssignmentCreate>,
) -> AppResult<Json<AttributeSetAssignment>> {
    let repo = AttributeSetRepository::new(state.db.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(format!(
            "Attribute set {}",
            id
        )));
    }
    Ok(Json(repo.assign_attribute(id, payload).await?))
}

/// DELETE /api/attribute-sets/:id/attributes/:attribute_id
pub async fn unassign(
    State(state): State<ServerState>,
    Path((id, attribute_id)): Path<(i64, i64)>,
) -> AppResult<Json<bool>> {
    let repo = AttributeSetRepository::new(state.db.clone());
    let removed = repo.unassign_attribute(id, attribute_id).await?;
    if !removed {
        return Err(AppError::not_found(format!(
            "Assignment of attribute {} to set {}",
            attribute_id, id
        )));
    }
    Ok(Json(true))
}
