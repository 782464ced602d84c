//! File storage API handlers

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::ServerState;
use crate::db::models::{DirectoryCreate, FileDirectory, FileGrant, GrantCreate, StoredFile};
use crate::db::repository::FileRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResponse, AppResult};

/// Maximum upload size (20MB)
const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub parent_id: Option<i64>,
    pub directory_id: Option<i64>,
}

/// GET /api/storage/directories?parent_id=
pub async fn list_directories(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<FileDirectory>>>> {
    let repo = FileRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(
        repo.find_directories(query.parent_id).await?,
    )))
}

/// POST /api/storage/directories
pub async fn create_directory(
    State(state): State<ServerState>,
    Json(payload): Json<DirectoryCreate>,
) -> AppResult<Json<AppResponse<FileDirectory>>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let repo = FileRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(
        repo.create_directory(payload).await?,
    )))
}

/// DELETE /api/storage/directories/:id
pub async fn delete_directory(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = FileRepository::new(state.db.clone());
    let deleted = repo.delete_directory(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Directory {}", id)));
    }
    Ok(Json(AppResponse::success(true)))
}

/// GET /api/storage/files?directory_id=
pub async fn list_files(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AppResponse<Vec<StoredFile>>>> {
    let repo = FileRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(
        repo.find_files(query.directory_id).await?,
    )))
}

/// POST /api/storage/files - multipart upload
///
/// Fields: `file` (required), `directory_id` (optional).
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<AppResponse<StoredFile>>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut original_name: Option<String> = None;
    let mut directory_id: Option<i64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        match field.name() {
            Some("file") => {
                original_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
                file_data = Some(bytes.to_vec());
            }
            Some("directory_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
                directory_id = Some(
                    text.parse()
                        .map_err(|_| AppError::validation("directory_id must be an integer"))?,
                );
            }
            _ => {}
        }
    }

    let data = file_data.ok_or_else(|| AppError::validation("No 'file' field found"))?;
    let file_name =
        original_name.ok_or_else(|| AppError::validation("No filename provided in file field"))?;

    if data.is_empty() {
        return Err(AppError::validation("Empty file provided"));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let repo = FileRepository::new(state.db.clone());
    if let Some(dir_id) = directory_id
        && repo.find_directory_by_id(dir_id).await?.is_none()
    {
        return Err(AppError::not_found(format!(
            "Directory {}",
            dir_id
        )));
    }

    let mime_type = mime_guess::from_path(&file_name)
        .first_or_octet_stream()
        .to_string();

    // Content lives under a uuid name; the original name stays in the row
    let extension = std::path::Path::new(&file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let disk_path = format!("{}{}", Uuid::new_v4(), extension);

    let storage_dir = state.config.storage_dir();
    tokio::fs::create_dir_all(&storage_dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create storage directory: {e}")))?;
    tokio::fs::write(storage_dir.join(&disk_path), &data)
        .await
        .map_err(|e| AppError::internal(format!("Failed to save file: {e}")))?;

    let file = repo
        .create_file(
            directory_id,
            &file_name,
            &disk_path,
            &mime_type,
            data.len() as i64,
            None,
        )
        .await?;

    tracing::info!(
        file_name = %file.file_name,
        size = file.size_bytes,
        "File uploaded"
    );

    Ok(Json(AppResponse::success(file)))
}

/// GET /api/storage/files/:id - raw download
pub async fn download(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let repo = FileRepository::new(state.db.clone());
    let file = repo
        .find_file_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("File {}", id)))?;

    let data = tokio::fs::read(state.storage_path(&file.disk_path))
        .await
        .map_err(|e| AppError::internal(format!("Failed to read file: {e}")))?;

    let headers = [
        (header::CONTENT_TYPE, file.mime_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.file_name),
        ),
    ];
    Ok((headers, data).into_response())
}

/// GET /api/storage/files/:id/meta
pub async fn file_meta(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<StoredFile>>> {
    let repo = FileRepository::new(state.db.clone());
    let file = repo
        .find_file_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("File {}", id)))?;
    Ok(Json(AppResponse::success(file)))
}

/// DELETE /api/storage/files/:id
pub async fn delete_file(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = FileRepository::new(state.db.clone());
    let file = repo
        .find_file_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("File {}", id)))?;

    repo.delete_file(id).await?;

    // Disk cleanup is best-effort; a stale blob is harmless
    if let Err(e) = tokio::fs::remove_file(state.storage_path(&file.disk_path)).await {
        tracing::warn!(file_id = id, error = %e, "Failed to remove file content");
    }

    Ok(Json(AppResponse::success_with_message(true, "File deleted")))
}

/// GET /api/storage/grants/:entity_type/:entity_id
pub async fn list_grants(
    State(state): State<ServerState>,
    Path((entity_type, entity_id)): Path<(String, i64)>,
) -> AppResult<Json<AppResponse<Vec<FileGrant>>>> {
    let repo = FileRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(
        repo.find_grants(&entity_type, entity_id).await?,
    )))
}

/// POST /api/storage/grants
pub async fn create_grant(
    State(state): State<ServerState>,
    Json(payload): Json<GrantCreate>,
) -> AppResult<Json<AppResponse<FileGrant>>> {
    let repo = FileRepository::new(state.db.clone());
    Ok(Json(AppResponse::success(repo.create_grant(payload).await?)))
}

/// DELETE /api/storage/grants/:id
pub async fn delete_grant(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = FileRepository::new(state.db.clone());
    let deleted = repo.delete_grant(id).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Grant {}", id)));
    }
    Ok(Json(AppResponse::success(true)))
}
