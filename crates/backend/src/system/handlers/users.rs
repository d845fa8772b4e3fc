use axum::{
    extract::{Json, Path},
    http::StatusCode,
};
use contracts::shared::api_response::ApiResponse;
use contracts::system::users::{ChangePasswordDto, SystemUser, SystemUserDto};
use serde_json::{json, Value};

use crate::shared::error::ServiceError;
use crate::shared::storage::get_store;
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

type Envelope<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

fn fail<T>(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiResponse<T>>) {
    (status, Json(ApiResponse::err(message)))
}

fn service_failure<T>(e: ServiceError) -> (StatusCode, Json<ApiResponse<T>>) {
    match e {
        ServiceError::Validation(errors) => {
            let message = errors.values().cloned().collect::<Vec<_>>().join("; ");
            fail(StatusCode::BAD_REQUEST, message)
        }
        ServiceError::NotFound => fail(StatusCode::NOT_FOUND, "User not found"),
        ServiceError::Forbidden => fail(StatusCode::FORBIDDEN, "Permission denied"),
        ServiceError::Other(e) => {
            tracing::error!("User operation failed: {:#}", e);
            fail(StatusCode::INTERNAL_SERVER_ERROR, "Failed to process user request")
        }
    }
}

/// GET /api/system/users
pub async fn list(CurrentUser(_claims): CurrentUser) -> Envelope<Vec<SystemUser>> {
    match service::list_all().await {
        Ok(users) => Ok(Json(ApiResponse::ok(users))),
        Err(e) => Err(service_failure(e.into())),
    }
}

/// GET /api/system/users/:id
pub async fn get_by_id(CurrentUser(_claims): CurrentUser, Path(id): Path<String>) -> Envelope<SystemUser> {
    match service::get_by_id(&id).await {
        Ok(Some(user)) => Ok(Json(ApiResponse::ok(user))),
        Ok(None) => Err(fail(StatusCode::NOT_FOUND, "User not found")),
        Err(e) => Err(service_failure(e.into())),
    }
}

/// POST /api/system/users
pub async fn create(CurrentUser(claims): CurrentUser, Json(dto): Json<SystemUserDto>) -> Envelope<Value> {
    match service::create(dto, get_store()).await {
        Ok(uid) => {
            tracing::info!("{} created user {}", claims.email, uid);
            Ok(Json(ApiResponse::ok(json!({ "uid": uid }))))
        }
        Err(e) => Err(service_failure(e)),
    }
}

/// PUT /api/system/users/:id
pub async fn update(
    CurrentUser(_claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<SystemUserDto>,
) -> Envelope<SystemUser> {
    service::update(&id, dto, get_store())
        .await
        .map(|user| Json(ApiResponse::ok(user)))
        .map_err(service_failure)
}

/// DELETE /api/system/users/:id
pub async fn delete(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> Envelope<Value> {
    if claims.sub == id {
        return Err(fail(StatusCode::BAD_REQUEST, "You cannot delete your own account"));
    }
    match service::delete(&id).await {
        Ok(true) => Ok(Json(ApiResponse::ok(json!({ "uid": id })))),
        Ok(false) => Err(fail(StatusCode::NOT_FOUND, "User not found")),
        Err(e) => Err(service_failure(e.into())),
    }
}

/// POST /api/system/users/:id/change-password (self or admin)
pub async fn change_password(
    current: CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ChangePasswordDto>,
) -> Envelope<Value> {
    if !current.may_manage(&id) {
        return Err(fail(StatusCode::FORBIDDEN, "Permission denied"));
    }
    service::change_password(&id, dto, current.id(), current.0.role)
        .await
        .map(|_| Json(ApiResponse::ok(json!({ "uid": id }))))
        .map_err(service_failure)
}
