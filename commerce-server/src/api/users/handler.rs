//! User and role API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Role, RoleCreate, User, UserCreate, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResponse, AppResult};

/// GET /api/users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<User>>>> {
    let repo = UserRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(repo.find_all().await?)))
}

/// GET /api/users/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<User>>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", id)))?;
    Ok(Json(AppResponse::success(user)))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<AppResponse<User>>> {
    validate_required_text(&payload.email, "email", MAX_EMAIL_LEN)?;
    if !payload.email.contains('@') {
        return Err(AppError::validation("email is not a valid address"));
    }
    validate_required_text(&payload.display_name, "display_name", MAX_NAME_LEN)?;

    let repo = UserRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(repo.create(payload).await?)))
}

/// PUT /api/users/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<AppResponse<User>>> {
    let repo = UserRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(repo.update(id, payload).await?)))
}

/// DELETE /api/users/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = UserRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("User {}", id)));
    }
    Ok(Json(AppResponse::success_with_message(true, "User deleted")))
}

/// GET /api/users/:id/roles
pub async fn list_user_roles(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<Role>>>> {
    let repo = UserRepository::new(state.db.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(format!("User {}", id)));
    }
    Ok(Json(AppResponse::success(
        repo.find_roles_for_user(id).await?,
    )))
}

/// GET /api/roles
pub async fn list_roles(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<Role>>>> {
    let repo = UserRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(repo.find_roles().await?)))
}

/// POST /api/roles
pub async fn create_role(
    State(state): State<ServerState>,
    Json(payload): Json<RoleCreate>,
) -> AppResult<Json<AppResponse<Role>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let repo = UserRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(repo.create_role(payload).await?)))
}

/// DELETE /api/roles/:id
pub async fn delete_role(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = UserRepository::new(state.db.clone());
    let deleted = repo.delete_role(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Role {}", id)));
    }
    Ok(Json(AppResponse::success(true)))
}
