use axum::{http::StatusCode, Json};
use contracts::dashboards::d400_directory_summary::DirectorySummaryResponse;

use crate::dashboards::d400_directory_summary::service;

/// GET /api/dashboard/summary
pub async fn get_summary() -> Result<Json<DirectorySummaryResponse>, StatusCode> {
    match service::get_directory_summary().await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            tracing::error!("Failed to build directory summary: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
