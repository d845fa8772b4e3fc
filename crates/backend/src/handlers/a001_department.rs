use axum::{extract::Path, http::StatusCode, Json};
use contracts::domain::a001_department::aggregate::{Department, DepartmentDto};
use serde_json::json;

use super::parse_uuid;
use crate::domain::a001_department;
use crate::shared::error::ApiError;

/// GET /api/departments
pub async fn list_all() -> Result<Json<Vec<Department>>, StatusCode> {
    match a001_department::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list departments: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/departments/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Department>, StatusCode> {
    let uuid = parse_uuid(&id)?;
    match a001_department::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load department {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/departments
pub async fn create(
    Json(dto): Json<DepartmentDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let id = a001_department::service::create(dto).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id.to_string() }))))
}

/// PUT /api/departments/:id
pub async fn update(
    Path(id): Path<String>,
    Json(dto): Json<DepartmentDto>,
) -> Result<Json<Department>, ApiError> {
    let uuid = parse_uuid(&id).map_err(|_| ApiError::BadRequest("Invalid id".into()))?;
    Ok(Json(a001_department::service::update(uuid, dto).await?))
}

/// DELETE /api/departments/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let uuid = parse_uuid(&id)?;
    match a001_department::service::delete(uuid).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete department {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
