use serde::{Deserialize, Serialize};

use crate::domain::a001_department::aggregate::normalize_description;
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::category_cache::CategoryItem;

crate::uuid_aggregate_id!(
    /// Unit identifier
    UnitId
);

/// Leaf of the hierarchy, owned by an institute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(flatten)]
    pub base: BaseAggregate<UnitId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "instituteId")]
    pub institute_id: String,
}

impl Unit {
    pub fn new_for_insert(name: String, description: Option<String>, institute_id: String) -> Self {
        Self {
            base: BaseAggregate::new(UnitId::new_v4()),
            name,
            description,
            institute_id,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &UnitDto) {
        self.name = dto.name.trim().to_string();
        self.description = normalize_description(dto.description.as_deref());
        self.institute_id = dto.institute_id.trim().to_string();
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Unit name is required".into());
        }
        if self.institute_id.trim().is_empty() {
            return Err("Institute is required".into());
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
            parent_id: Some(self.institute_id.clone()),
        }
    }
}

impl AggregateRoot for Unit {
    type Id = UnitId;

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
        "a003"
    }

    fn collection_name() -> &'static str {
        "unit"
    }

    fn element_name() -> &'static str {
        "Unit"
    }

    fn list_name() -> &'static str {
        "Units"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UnitDto {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "instituteId")]
    pub institute_id: String,
}
