use axum::{
    extract::{Multipart, Path},
    Json,
};
use serde_json::json;

use crate::shared::error::ApiError;
use crate::shared::storage::{self, get_store, UploadCategory};

/// POST /api/uploads/:category
///
/// Multipart body with a single `file` field. Answers `{url}`.
pub async fn upload(
    Path(category): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let category = UploadCategory::parse(&category)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {}", e)))?;

        storage::check_upload(&content_type, bytes.len())?;
        let url = storage::store_upload(get_store(), category, &file_name, &content_type, &bytes)
            .await?;
        return Ok(Json(json!({ "url": url })));
    }

    Err(ApiError::BadRequest("Missing file field".into()))
}
