//! Activity log record. Declared for API compatibility; nothing writes it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Contact,
    Department,
    Institute,
    Unit,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub action: ActivityAction,
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub details: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&ActivityAction::Delete).unwrap(), "\"delete\"");
        assert_eq!(serde_json::to_string(&ResourceType::Institute).unwrap(), "\"institute\"");
    }
}
