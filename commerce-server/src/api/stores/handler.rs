//! Store API handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{Store, StoreCreate, StoreSetting, StoreSettingUpsert, StoreUpdate};
use crate::db::repository::StoreRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_code, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult};

/// GET /api/stores
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Store>>>> {
    let repo = StoreRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(repo.find_all().await?)))
}

/// GET /api/stores/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Store>>> {
    let repo = StoreRepository::new(state.db.clone());
    let store = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Store {}", id)))?;
    Ok(Json(AppResponse::success(store)))
}

/// POST /api/stores
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StoreCreate>,
) -> AppResult<Json<AppResponse<Store>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_code(&payload.slug, "slug")?;

    let repo = StoreRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(repo.create(payload).await?)))
}

/// PUT /api/stores/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StoreUpdate>,
) -> AppResult<Json<AppResponse<Store>>> {
    let repo = StoreRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(repo.update(id, payload).await?)))
}

/// DELETE /api/stores/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = StoreRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Store {}", id)));
    }
    Ok(Json(AppResponse::success_with_message(true, "Store deleted")))
}

/// GET /api/stores/:id/settings
pub async fn list_settings(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<Vec<StoreSetting>>>> {
    let repo = StoreRepository::new(state.db.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found(format!("Store {}", id)));
    }
    Ok(Json(AppResponse::success(repo.find_settings(id).await?)))
}

/// PUT /api/stores/:id/settings - insert or overwrite one setting
pub async fn upsert_setting(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StoreSettingUpsert>,
) -> AppResult<Json<AppResponse<StoreSetting>>> {
    validate_required_text(&payload.setting_key, "setting_key", MAX_NAME_LEN)?;

    let repo = StoreRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(
        repo.upsert_setting(id, payload).await?,
    )))
}

/// DELETE /api/stores/:id/settings/:key
pub async fn delete_setting(
    State(state): State<ServerState>,
    Path((id, key)): Path<(i64, String)>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = StoreRepository::new(state.db.clone());
    let deleted = repo.delete_setting(id, &key).await?;
    if !deleted {
        return Err(AppError::not_found(format!(
            "Setting '{}' on store {}",
            key, id
        )));
    }
    Ok(Json(AppResponse::success(true)))
}
