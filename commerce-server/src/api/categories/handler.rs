//! Category API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::CategoryRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_code, validate_required_text};
use crate::utils::{AppError, AppResult};

/// GET /api/categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.db.clone());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/categories/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.db.clone());
    let cat = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {}", id)))?;
    Ok(Json(cat))
}

/// GET /api/categories/:id/children
pub async fn children(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.db.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(format!("Category {}", id)));
    }
    Ok(Json(repo.find_children(id).await?))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_code(&payload.slug, "slug")?;

    let repo = CategoryRepository::new(state.db.clone());
    Ok(Json(repo.create(payload).await?))
}

/// PUT /api/categories/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.db.clone());
    Ok(Json(repo.update(id, payload).await?))
}

/// DELETE /api/categories/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = CategoryRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Category {}", id)));
    }
    Ok(Json(true))
}
