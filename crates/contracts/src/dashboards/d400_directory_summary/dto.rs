use serde::{Deserialize, Serialize};

/// Counter shown on a dashboard tile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    /// Value being counted, e.g. "Active" or "Staff"
    pub label: String,
    pub count: u64,
}

/// Response of `GET /api/dashboard/summary`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySummaryResponse {
    pub total_contacts: u64,
    /// One row per contact status, zero counts included
    pub by_status: Vec<CountRow>,
    /// One row per contact type, zero counts included
    pub by_type: Vec<CountRow>,
    pub departments: u64,
    pub institutes: u64,
    pub units: u64,
    pub users: u64,
}

impl DirectorySummaryResponse {
    pub fn status_count(&self, label: &str) -> u64 {
        self.by_status
            .iter()
            .find(|r| r.label == label)
            .map(|r| r.count)
            .unwrap_or(0)
    }
}
