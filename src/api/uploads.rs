use axum::{extract::Multipart, Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentInstructor;
use crate::api::validation::{sanitized_filename, validate_image_upload};
use crate::core::state::AppState;

#[derive(Debug, Serialize)]
struct ThumbnailUploadResponse {
    url: String,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/thumbnail", axum::routing::post(upload_thumbnail))
}

async fn upload_thumbnail(
    CurrentInstructor(instructor): CurrentInstructor,
    state: axum::extract::State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ThumbnailUploadResponse>, ApiError> {
    // Missing storage credentials are a configuration problem surfaced to
    // this one request, not a reason the process cannot serve everything
    // else.
    let storage = state.storage().ok_or_else(|| {
        ApiError::ServiceUnavailable(
            "File storage is not configured. Set S3_ACCESS_KEY, S3_SECRET_KEY and S3_BUCKET."
                .to_string(),
        )
    })?;

    let max_bytes = state.settings().storage().max_upload_size_bytes();
    let max_mb = state.settings().storage().max_upload_size_mb;

    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        filename = field.file_name().map(|s| s.to_string());
        content_type = field.content_type().map(|s| s.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|_| ApiError::BadRequest("Failed to read file".to_string()))?
        {
            let next_size = bytes.len() as u64 + chunk.len() as u64;
            if next_size > max_bytes {
                return Err(ApiError::BadRequest(format!(
                    "File size must be less than {max_mb}MB"
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        file_bytes = Some(bytes);
    }

    let file_bytes = file_bytes.ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;
    let filename = filename.unwrap_or_else(|| "thumbnail.jpg".to_string());
    let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    validate_image_upload(
        &filename,
        &content_type,
        &state.settings().storage().allowed_image_extensions,
    )?;

    let key = format!("thumbnails/{}-{}", Uuid::new_v4(), sanitized_filename(&filename));

    storage
        .upload_bytes(&key, &content_type, file_bytes)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to upload thumbnail"))?;

    let url = storage.public_url(&key);

    tracing::info!(
        instructor_id = %instructor.id,
        key = %key,
        action = "thumbnail_upload",
        "Instructor uploaded thumbnail"
    );

    Ok(Json(ThumbnailUploadResponse { url }))
}
