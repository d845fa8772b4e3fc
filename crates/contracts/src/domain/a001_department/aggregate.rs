use serde::{Deserialize, Serialize};

use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::category_cache::CategoryItem;

crate::uuid_aggregate_id!(
    /// Department identifier
    DepartmentId
);

/// Top level of the category hierarchy. Owns zero or more institutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(flatten)]
    pub base: BaseAggregate<DepartmentId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Department {
    pub fn new_for_insert(name: String, description: Option<String>) -> Self {
        Self {
            base: BaseAggregate::new(DepartmentId::new_v4()),
            name,
            description,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &DepartmentDto) {
        self.name = dto.name.trim().to_string();
        self.description = normalize_description(dto.description.as_deref());
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Department name is required".into());
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
            parent_id: None,
        }
    }
}

impl AggregateRoot for Department {
    type Id = DepartmentId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "department"
    }

    fn element_name() -> &'static str {
        "Department"
    }

    fn list_name() -> &'static str {
        "Departments"
    }
}

/// Create/update form for a department
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DepartmentDto {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
}

/// Blank descriptions are stored as absent.
pub fn normalize_description(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_trims_and_drops_blank_description() {
        let mut dept = Department::new_for_insert("Old".into(), Some("x".into()));
        dept.update(&DepartmentDto {
            id: None,
            name: "  Agriculture  ".into(),
            description: Some("   ".into()),
        });
        assert_eq!(dept.name, "Agriculture");
        assert_eq!(dept.description, None);
    }

    #[test]
    fn test_validate_requires_name() {
        let dept = Department::new_for_insert(" ".into(), None);
        assert!(dept.validate().is_err());
    }

    #[test]
    fn test_category_item_has_no_parent() {
        let dept = Department::new_for_insert("Agriculture".into(), None);
        let item = dept.to_category_item();
        assert_eq!(item.id, dept.to_string_id());
        assert!(item.parent_id.is_none());
    }

    #[test]
    fn test_full_name_is_table_name() {
        assert_eq!(Department::full_name(), "a001_department");
    }
}
