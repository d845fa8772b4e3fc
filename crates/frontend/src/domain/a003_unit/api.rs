use contracts::domain::a003_unit::aggregate::{Unit, UnitDto};
use serde_json::Value;

use crate::shared::api_utils::{self, ApiFailure};

/// Units of one institute, or all of them
pub async fn fetch(institute_id: Option<&str>) -> Result<Vec<Unit>, ApiFailure> {
    let path = match institute_id {
        Some(id) => format!("/api/units?institute={}", urlencoding::encode(id)),
        None => "/api/units".to_string(),
    };
    api_utils::get_json(&path).await
}

pub async fn create(dto: &UnitDto) -> Result<(), ApiFailure> {
    api_utils::post_json::<_, Value>("/api/units", dto).await.map(|_| ())
}

pub async fn update(id: &str, dto: &UnitDto) -> Result<(), ApiFailure> {
    api_utils::put_json::<_, Value>(&format!("/api/units/{}", id), dto)
        .await
        .map(|_| ())
}

pub async fn delete(id: &str) -> Result<(), ApiFailure> {
    api_utils::delete(&format!("/api/units/{}", id)).await
}
