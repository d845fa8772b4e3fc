use contracts::domain::a001_department::aggregate::{Department, DepartmentDto};
use serde_json::Value;

use crate::shared::api_utils::{self, ApiFailure};

pub async fn fetch_all() -> Result<Vec<Department>, ApiFailure> {
    api_utils::get_json("/api/departments").await
}

pub async fn create(dto: &DepartmentDto) -> Result<(), ApiFailure> {
    api_utils::post_json::<_, Value>("/api/departments", dto).await.map(|_| ())
}

pub async fn update(id: &str, dto: &DepartmentDto) -> Result<(), ApiFailure> {
    api_utils::put_json::<_, Value>(&format!("/api/departments/{}", id), dto)
        .await
        .map(|_| ())
}

pub async fn delete(id: &str) -> Result<(), ApiFailure> {
    api_utils::delete(&format!("/api/departments/{}", id)).await
}
