//! Translation API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{
    CacheStats, Language, LanguageCreate, Namespace, NamespaceCreate, Translation,
    TranslationEntry, TranslationKey, TranslationKeyCreate, TranslationUpsert,
};
use crate::db::repository::TranslationRepository;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_TRANSLATION_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult};

/// GET /api/translations/:language/:namespace - served from the cache
pub async fn get_entries(
    State(state): State<ServerState>,
    Path((language, namespace)): Path<(String, String)>,
) -> AppResult<Json<Vec<TranslationEntry>>> {
    let entries = state.translation_cache.get(&language, &namespace).await?;
    Ok(Json(entries))
}

/// POST /api/translations - upsert one value and invalidate its cache key
pub async fn upsert(
    State(state): State<ServerState>,
    Json(payload): Json<TranslationUpsert>,
) -> AppResult<Json<Translation>> {
    validate_required_text(&payload.key_path, "key_path", MAX_NAME_LEN)?;
    validate_required_text(&payload.value, "value", MAX_TRANSLATION_LEN)?;

    let language = payload.language_code.clone();
    let namespace = payload.namespace.clone();

    let repo = TranslationRepository::new(state.db.clone());
    let translation = repo.upsert(payload).await?;

    state
        .translation_cache
        .clear(Some(&language), Some(&namespace))
        .await;

    Ok(Json(translation))
}

/// DELETE /api/translations/entry/:id
///
/// The row does not carry its language/namespace, so the whole cache
/// is dropped.
pub async fn delete_entry(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = TranslationRepository::new(state.db.clone());
    let deleted = repo.delete(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Translation {}", id)));
    }
    state.translation_cache.clear(None, None).await;
    Ok(Json(true))
}

// =========================================================================
// Languages / namespaces / keys
// =========================================================================

/// GET /api/translations/languages
pub async fn list_languages(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Language>>> {
    let repo = TranslationRepository::new(state.db.clone());
    Ok(Json(repo.find_languages().await?))
}

/// POST /api/translations/languages
pub async fn create_language(
    State(state): State<ServerState>,
    Json(payload): Json<LanguageCreate>,
) -> AppResult<Json<Language>> {
    validate_required_text(&payload.code, "code", MAX_NAME_LEN)?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let repo = TranslationRepository::new(state.db.clone());
    Ok(Json(repo.create_language(payload).await?))
}

/// DELETE /api/translations/languages/:id
pub async fn delete_language(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = TranslationRepository::new(state.db.clone());
    let deleted = repo.delete_language(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Language {}", id)));
    }
    state.translation_cache.clear(None, None).await;
    Ok(Json(true))
}

/// GET /api/translations/namespaces
pub async fn list_namespaces(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Namespace>>> {
    let repo = TranslationRepository::new(state.db.clone());
    Ok(Json(repo.find_namespaces().await?))
}

/// POST /api/translations/namespaces
pub async fn create_namespace(
    State(state): State<ServerState>,
    Json(payload): Json<NamespaceCreate>,
) -> AppResult<Json<Namespace>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let repo = TranslationRepository::new(state.db.clone());
    Ok(Json(repo.create_namespace(payload).await?))
}

/// GET /api/translations/namespaces/:id/keys
pub async fn list_keys(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<TranslationKey>>> {
    let repo = TranslationRepository::new(state.db.clone());
    Ok(Json(repo.find_keys(id).await?))
}

/// POST /api/translations/keys
pub async fn create_key(
    State(state): State<ServerState>,
    Json(payload): Json<TranslationKeyCreate>,
) -> AppResult<Json<TranslationKey>> {
    validate_required_text(&payload.key_path, "key_path", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let repo = TranslationRepository::new(state.db.clone());
    Ok(Json(repo.create_key(payload).await?))
}

// =========================================================================
// Cache control
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct CacheClearQuery {
    pub language: Option<String>,
    pub namespace: Option<String>,
}

/// POST /api/translations/cache/clear?language=&namespace=
///
/// Both parameters are optional wildcards.
pub async fn cache_clear(
    State(state): State<ServerState>,
    Query(query): Query<CacheClearQuery>,
) -> AppResult<Json<bool>> {
    state
        .translation_cache
        .clear(query.language.as_deref(), query.namespace.as_deref())
        .await;
    Ok(Json(true))
}

#[derive(Debug, Deserialize)]
pub struct WarmUpRequest {
    pub language: String,
    pub namespace: String,
}

/// POST /api/translations/cache/warm-up
pub async fn cache_warm_up(
    State(state): State<ServerState>,
    Json(payload): Json<Vec<WarmUpRequest>>,
) -> AppResult<Json<usize>> {
    let pairs: Vec<(String, String)> = payload
        .into_iter()
        .map(|p| (p.language, p.namespace))
        .collect();
    let loaded = state.translation_cache.warm_up(&pairs).await?;
    Ok(Json(loaded))
}

/// GET /api/translations/cache/stats
pub async fn cache_stats(State(state): State<ServerState>) -> Json<CacheStats> {
    Json(state.translation_cache.stats().await)
}
