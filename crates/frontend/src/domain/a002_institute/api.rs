use contracts::domain::a002_institute::aggregate::{Institute, InstituteDto};
use serde_json::Value;

use crate::shared::api_utils::{self, ApiFailure};

/// Institutes of one department, or all of them
pub async fn fetch(department_id: Option<&str>) -> Result<Vec<Institute>, ApiFailure> {
    let path = match department_id {
        Some(id) => format!("/api/institutes?department={}", urlencoding::encode(id)),
        None => "/api/institutes".to_string(),
    };
    api_utils::get_json(&path).await
}

pub async fn create(dto: &InstituteDto) -> Result<(), ApiFailure> {
    api_utils::post_json::<_, Value>("/api/institutes", dto).await.map(|_| ())
}

pub async fn update(id: &str, dto: &InstituteDto) -> Result<(), ApiFailure> {
    api_utils::put_json::<_, Value>(&format!("/api/institutes/{}", id), dto)
        .await
        .map(|_| ())
}

pub async fn delete(id: &str) -> Result<(), ApiFailure> {
    api_utils::delete(&format!("/api/institutes/{}", id)).await
}
