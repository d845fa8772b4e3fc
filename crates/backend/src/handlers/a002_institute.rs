use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a002_institute::aggregate::{Institute, InstituteDto};
use serde::Deserialize;
use serde_json::json;

use super::parse_uuid;
use crate::domain::a002_institute;
use crate::shared::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub department: Option<String>,
}

/// GET /api/institutes?department=
pub async fn list(Query(query): Query<ListQuery>) -> Result<Json<Vec<Institute>>, StatusCode> {
    let result = match query.department.as_deref().map(str::trim) {
        Some(department_id) if !department_id.is_empty() => {
            a002_institute::service::list_by_department(department_id).await
        }
        _ => a002_institute::service::list_all().await,
    };
    match result {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list institutes: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/institutes/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Institute>, StatusCode> {
    let uuid = parse_uuid(&id)?;
    match a002_institute::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load institute {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/institutes
pub async fn create(
    Json(dto): Json<InstituteDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let id = a002_institute::service::create(dto).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id.to_string() }))))
}

/// PUT /api/institutes/:id
pub async fn update(
    Path(id): Path<String>,
    Json(dto): Json<InstituteDto>,
) -> Result<Json<Institute>, ApiError> {
    let uuid = parse_uuid(&id).map_err(|_| ApiError::BadRequest("Invalid id".into()))?;
    Ok(Json(a002_institute::service::update(uuid, dto).await?))
}

/// DELETE /api/institutes/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let uuid = parse_uuid(&id)?;
    match a002_institute::service::delete(uuid).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete institute {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
