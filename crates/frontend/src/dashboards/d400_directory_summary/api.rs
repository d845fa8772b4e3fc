use contracts::dashboards::d400_directory_summary::DirectorySummaryResponse;

use crate::shared::api_utils::{get_json, ApiFailure};

/// Directory counters for the landing page
pub async fn get_directory_summary() -> Result<DirectorySummaryResponse, ApiFailure> {
    get_json("/api/dashboard/summary").await
}
