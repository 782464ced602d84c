//! Attribute API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{
    Attribute, AttributeCreate, AttributeUpdate, AttributeValue, AttributeValueCreate,
};
use crate::db::repository::AttributeRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_code, validate_required_text};
use crate::utils::{AppError, AppResult};

const INPUT_TYPES: &[&str] = &["select", "multiselect", "text", "number", "boolean"];
const DATA_TYPES: &[&str] = &["string", "number", "boolean"];

/// GET /api/attributes
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Attribute>>> {
    let repo = AttributeRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/attributes/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Attribute>> {
    let repo = AttributeRepository::new(state.db.clone());
    let attr = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Attribute {}", id)))?;
    Ok(Json(attr))
}

/// GET /api/attributes/code/:code
pub async fn get_by_code(
    State(state): State<ServerState>,
    Path(code): Path<String>,
) -> AppResult<Json<Attribute>> {
    let repo = AttributeRepository::new(state.db.clone());
    let attr = repo
        .find_by_code(&code)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Attribute '{}'", code)))?;
    Ok(Json(attr))
}

/// POST /api/attributes
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AttributeCreate>,
) -> AppResult<Json<Attribute>> {
    validate_code(&payload.code, "code")?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if !INPUT_TYPES.contains(&payload.input_type.as_str()) {
        return Err(AppError::validation(format!(
            "Unknown input type '{}'",
            payload.input_type
        )));
    }
    if !DATA_TYPES.contains(&payload.data_type.as_str()) {
        return Err(AppError::validation(format!(
            "Unknown data type '{}'",
            payload.data_type
        )));
    }

    let repo = AttributeRepository::new(state.db.clone());
    Ok(Json(repo.create(payload).await?))
}

/// PUT /api/attributes/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AttributeUpdate>,
) -> AppResult<Json<Attribute>> {
    let repo = AttributeRepository::new(state.db.clone());
    Ok(Json(repo.update(id, payload).await?))
}

/// DELETE /api/attributes/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = AttributeRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Attribute {}", id)));
    }
    Ok(Json(true))
}

/// GET /api/attributes/:id/values
pub async fn list_values(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<AttributeValue>>> {
    let repo = AttributeRepository::new(state.db.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(format!("Attribute {}", id)));
    }
    Ok(Json(repo.find_values(id).await?))
}

/// POST /api/attributes/:id/values
pub async fn add_value(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<AttributeValueCreate>,
) -> AppResult<Json<AttributeValue>> {
    validate_code(&payload.value_code, "value_code")?;
    validate_required_text(&payload.label, "label", MAX_NAME_LEN)?;

    let repo = AttributeRepository::new(state.db.clone());
    Ok(Json(repo.add_value(id, payload).await?))
}
