use serde::{Deserialize, Serialize};

use crate::domain::a001_department::aggregate::normalize_description;
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::category_cache::CategoryItem;

crate::uuid_aggregate_id!(
    /// Institute identifier
    InstituteId
);

/// Second level of the hierarchy, owned by a department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institute {
    #[serde(flatten)]
    pub base: BaseAggregate<InstituteId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Back-reference to the owning department. Not enforced.
    #[serde(rename = "departmentId")]
    pub department_id: String,
}

impl Institute {
    pub fn new_for_insert(name: String, description: Option<String>, department_id: String) -> Self {
        Self {
            base: BaseAggregate::new(InstituteId::new_v4()),
            name,
            description,
            department_id,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &InstituteDto) {
        self.name = dto.name.trim().to_string();
        self.description = normalize_description(dto.description.as_deref());
        self.department_id = dto.department_id.trim().to_string();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Institute name is required".into());
        }
        if self.department_id.trim().is_empty() {
            return Err("Department is required".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    pub fn to_category_item(&self) -> CategoryItem {
        CategoryItem {
            id: self.to_string_id(),
            name: self.name.clone(),
            parent_id: Some(self.department_id.clone()),
        }
    }
}

impl AggregateRoot for Institute {
    type Id = InstituteId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "institute"
    }

    fn element_name() -> &'static str {
        "Institute"
    }

    fn list_name() -> &'static str {
        "Institutes"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InstituteDto {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "departmentId")]
    pub department_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_department() {
        let inst = Institute::new_for_insert("Rice Research".into(), None, "".into());
        assert_eq!(inst.validate(), Err("Department is required".to_string()));
    }

    #[test]
    fn test_category_item_points_at_department() {
        let inst = Institute::new_for_insert("Rice Research".into(), None, "d1".into());
        assert_eq!(inst.to_category_item().parent_id.as_deref(), Some("d1"));
    }

    #[test]
    fn test_serializes_department_id_camel_case() {
        let inst = Institute::new_for_insert("Rice Research".into(), None, "d1".into());
        let json = serde_json::to_value(&inst).unwrap();
        assert_eq!(json["departmentId"], "d1");
        assert!(json.get("createdAt").is_some());
    }
}
