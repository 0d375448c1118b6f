use axum::{
    Json,
    extract::{Multipart, State},
};
use std::path::Path;
use uuid::Uuid;

use crate::{
    AppState,
    api::models::{files::FileResponse, users::CurrentUser},
    db::{handlers::Files, models::files::FileCreateDBRequest},
    errors::Error,
};

/// Upload an avatar file (multipart field `file`).
///
/// The file body is written to the configured uploads directory under a
/// generated name; the original filename is kept in the metadata record.
#[utoipa::path(
    post,
    path = "/files",
    tag = "files",
    request_body(
        content_type = "multipart/form-data",
        description = "Avatar upload"
    ),
    responses(
        (status = 200, description = "File stored", body = FileResponse),
        (status = 400, description = "Missing file field or oversized upload"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn upload_file(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<FileResponse>, Error> {
    let max_file_size = state.config.uploads.max_file_size;

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().map(|s| s.to_string()).unwrap_or_else(|| "upload".to_string());

        let data = field.bytes().await.map_err(|e| Error::BadRequest {
            message: format!("Failed to read file upload: {e}"),
        })?;

        if data.len() as u64 > max_file_size {
            return Err(Error::BadRequest {
                message: format!("File exceeds the maximum allowed size of {max_file_size} bytes"),
            });
        }

        // Generated on-disk name keeps the original extension only
        let disk_name = match Path::new(&original_name).extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };

        let uploads_dir = &state.config.uploads.dir;
        tokio::fs::create_dir_all(uploads_dir).await.map_err(|e| Error::Internal {
            operation: format!("create uploads directory: {e}"),
        })?;
        tokio::fs::write(uploads_dir.join(&disk_name), &data)
            .await
            .map_err(|e| Error::Internal {
                operation: format!("write uploaded file: {e}"),
            })?;

        tracing::info!(name = %original_name, disk_name = %disk_name, size = data.len(), "Stored uploaded file");

        let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
        let record = Files::new(&mut conn)
            .create(&FileCreateDBRequest {
                name: original_name,
                path: disk_name,
            })
            .await?;

        return Ok(Json(FileResponse::from_record(record, &state.config.uploads.base_url)));
    }

    Err(Error::BadRequest {
        message: "Multipart upload must contain a 'file' field".to_string(),
    })
}

/// List uploaded files
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    responses(
        (status = 200, description = "All uploaded files", body = [FileResponse]),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_files(State(state): State<AppState>, _current_user: CurrentUser) -> Result<Json<Vec<FileResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let files = Files::new(&mut conn).list().await?;

    let base_url = &state.config.uploads.base_url;
    Ok(Json(files.into_iter().map(|f| FileResponse::from_record(f, base_url)).collect()))
}
