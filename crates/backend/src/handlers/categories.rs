use axum::{http::StatusCode, Json};
use contracts::shared::category_cache::CategorySnapshot;

use crate::domain::categories;

/// GET /api/categories
///
/// All three category lists in one response.
pub async fn snapshot() -> Result<Json<CategorySnapshot>, StatusCode> {
    match categories::load_snapshot().await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            tracing::error!("Failed to load categories: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
