use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::shared::validation::ErrorMap;
use serde_json::json;
use thiserror::Error;

use crate::shared::storage::UploadRejection;

/// Error returned by handlers that report more than a status code
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(ErrorMap),
    #[error("{0}")]
    BadRequest(String),
    #[error("Not found")]
    NotFound,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden")]
    Forbidden,
    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadRejection),
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::Upload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => json!({
                "error": "Validation failed",
                "errors": errors,
            }),
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                json!({ "error": "Something went wrong, please try again" })
            }
            ApiError::Upload(rejection) => json!({ "error": rejection.to_string() }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Service failure that the client can act on
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed")]
    Validation(ErrorMap),
    #[error("Not found")]
    NotFound,
    #[error("Forbidden")]
    Forbidden,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ServiceError {
    /// Validation failure on a single field
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ErrorMap::new();
        errors.insert(field.to_string(), message.into());
        ServiceError::Validation(errors)
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::Forbidden => ApiError::Forbidden,
            ServiceError::Other(e) => match e.downcast::<UploadRejection>() {
                Ok(rejection) => ApiError::Upload(rejection),
                Err(e) => ApiError::Internal(e),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let mut errors = ErrorMap::new();
        errors.insert("fullName".into(), "Full name is required".into());
        assert_eq!(ApiError::Validation(errors).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("db down")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upload_rejection_survives_anyhow() {
        let service_error = ServiceError::Other(anyhow::Error::new(UploadRejection::TooLarge));
        let api_error: ApiError = service_error.into();
        assert_eq!(api_error.status(), StatusCode::BAD_REQUEST);
    }
}
