use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a003_unit::aggregate::{Unit, UnitDto};
use serde::Deserialize;
use serde_json::json;

use super::parse_uuid;
use crate::domain::a003_unit;
use crate::shared::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub institute: Option<String>,
}

/// GET /api/units?institute=
pub async fn list(Query(query): Query<ListQuery>) -> Result<Json<Vec<Unit>>, StatusCode> {
    let result = match query.institute.as_deref().map(str::trim) {
        Some(institute_id) if !institute_id.is_empty() => {
            a003_unit::service::list_by_institute(institute_id).await
        }
        _ => a003_unit::service::list_all().await,
    };
    match result {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list units: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/units/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Unit>, StatusCode> {
    let uuid = parse_uuid(&id)?;
    match a003_unit::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load unit {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/units
pub async fn create(
    Json(dto): Json<UnitDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let id = a003_unit::service::create(dto).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id.to_string() }))))
}

/// PUT /api/units/:id
pub async fn update(
    Path(id): Path<String>,
    Json(dto): Json<UnitDto>,
) -> Result<Json<Unit>, ApiError> {
    let uuid = parse_uuid(&id).map_err(|_| ApiError::BadRequest("Invalid id".into()))?;
    Ok(Json(a003_unit::service::update(uuid, dto).await?))
}

/// DELETE /api/units/:id
pub async fn delete(Path(id): Path<String>) -> Result<StatusCode, StatusCode> {
    let uuid = parse_uuid(&id)?;
    match a003_unit::service::delete(uuid).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete unit {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
