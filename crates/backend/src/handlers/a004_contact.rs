use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a004_contact::aggregate::{Contact, ContactDto, ContactPatch};
use contracts::shared::contact_list::{ContactListParams, ContactPage};
use serde::Deserialize;
use serde_json::json;

use super::parse_uuid;
use crate::domain::a004_contact;
use crate::shared::error::ApiError;
use crate::system::auth::extractor::CurrentUser;

#[derive(Debug, Deserialize)]
pub struct FilterQuery {
    pub department: Option<String>,
    pub institute: Option<String>,
}

/// GET /api/contacts?department=&institute=
pub async fn list(Query(query): Query<FilterQuery>) -> Result<Json<Vec<Contact>>, StatusCode> {
    match a004_contact::service::list_filtered(query.department.as_deref(), query.institute.as_deref())
        .await
    {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list contacts: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/contacts/list
pub async fn list_page(
    Query(params): Query<ContactListParams>,
) -> Result<Json<ContactPage<Contact>>, StatusCode> {
    match a004_contact::service::list_page(&params).await {
        Ok(page) => Ok(Json(page)),
        Err(e) => {
            tracing::error!("Failed to build contact page: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/contacts/:id
pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<Contact>, StatusCode> {
    let uuid = parse_uuid(&id)?;
    match a004_contact::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load contact {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/contacts
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<ContactDto>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let id = a004_contact::service::create(dto).await?;
    tracing::info!("{} added contact {}", claims.email, id);
    Ok((StatusCode::CREATED, Json(json!({ "id": id.to_string() }))))
}

/// PUT /api/contacts/:id
pub async fn update(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(patch): Json<ContactPatch>,
) -> Result<Json<Contact>, ApiError> {
    let uuid = parse_uuid(&id).map_err(|_| ApiError::BadRequest("Invalid id".into()))?;
    let contact = a004_contact::service::update(uuid, patch).await?;
    tracing::info!("{} updated contact {}", claims.email, id);
    Ok(Json(contact))
}

/// DELETE /api/contacts/:id
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let uuid = parse_uuid(&id)?;
    match a004_contact::service::delete(uuid).await {
        Ok(true) => {
            tracing::info!("{} deleted contact {}", claims.email, id);
            Ok(StatusCode::NO_CONTENT)
        }
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete contact {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/contacts/testdata
pub async fn insert_test_data() -> StatusCode {
    match a004_contact::service::insert_test_data().await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::error!("Failed to insert test data: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
