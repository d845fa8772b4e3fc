//! Flat lists of departments, institutes and units with parent lookups.
//!
//! The lists are tens to low hundreds of rows, so lookups are linear scans.

use serde::{Deserialize, Serialize};

/// One row of a category list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    pub id: String,
    pub name: String,
    /// Department id for institutes, institute id for units
    #[serde(rename = "parentId", default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Result of one category load
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySnapshot {
    pub departments: Vec<CategoryItem>,
    pub institutes: Vec<CategoryItem>,
    pub units: Vec<CategoryItem>,
}

impl CategorySnapshot {
    /// Institutes whose parent is `department_id`
    pub fn institutes_of(&self, department_id: &str) -> Vec<&CategoryItem> {
        children_of(&self.institutes, department_id)
    }

    /// Units whose parent is `institute_id`
    pub fn units_of(&self, institute_id: &str) -> Vec<&CategoryItem> {
        children_of(&self.units, institute_id)
    }

    /// Display name lookups used to denormalize contact records
    pub fn department_name(&self, id: &str) -> Option<&str> {
        name_of(&self.departments, id)
    }

    pub fn institute_name(&self, id: &str) -> Option<&str> {
        name_of(&self.institutes, id)
    }

    pub fn unit_name(&self, id: &str) -> Option<&str> {
        name_of(&self.units, id)
    }
}

fn children_of<'a>(items: &'a [CategoryItem], parent_id: &str) -> Vec<&'a CategoryItem> {
    items
        .iter()
        .filter(|item| item.parent_id.as_deref() == Some(parent_id))
        .collect()
}

fn name_of<'a>(items: &'a [CategoryItem], id: &str) -> Option<&'a str> {
    items
        .iter()
        .find(|item| item.id == id)
        .map(|item| item.name.as_str())
}

/// Holds the last successful category load.
#[derive(Debug, Clone, Default)]
pub struct CategoryCache {
    snapshot: Option<CategorySnapshot>,
}

impl CategoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&CategorySnapshot> {
        self.snapshot.as_ref()
    }

    pub fn replace(&mut self, snapshot: CategorySnapshot) {
        self.snapshot = Some(snapshot);
    }

    /// Install the outcome of a load. On failure the previous snapshot stays
    /// and the error is handed back for the caller to report.
    pub fn apply_load<E>(&mut self, result: Result<CategorySnapshot, E>) -> Result<(), E> {
        self.replace(result?);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn item(id: &str, name: &str, parent: Option<&str>) -> CategoryItem {
        CategoryItem {
            id: id.into(),
            name: name.into(),
            parent_id: parent.map(Into::into),
        }
    }

    pub(crate) fn sample_snapshot() -> CategorySnapshot {
        CategorySnapshot {
            departments: vec![item("d1", "Agriculture", None), item("d2", "Irrigation", None)],
            institutes: vec![
                item("i1", "Rice Research", Some("d1")),
                item("i2", "Seed Certification", Some("d1")),
                item("i3", "Water Management", Some("d2")),
            ],
            units: vec![
                item("u1", "Breeding", Some("i1")),
                item("u2", "Pathology", Some("i1")),
                item("u3", "Canals", Some("i3")),
            ],
        }
    }

    #[test]
    fn test_institutes_of_filters_by_parent() {
        let snapshot = sample_snapshot();
        let ids: Vec<_> = snapshot.institutes_of("d1").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["i1", "i2"]);
        assert!(snapshot.institutes_of("missing").is_empty());
    }

    #[test]
    fn test_units_of_filters_by_parent() {
        let snapshot = sample_snapshot();
        let ids: Vec<_> = snapshot.units_of("i3").iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u3"]);
    }

    #[test]
    fn test_name_lookup() {
        let snapshot = sample_snapshot();
        assert_eq!(snapshot.department_name("d2"), Some("Irrigation"));
        assert_eq!(snapshot.unit_name("u9"), None);
    }

    #[test]
    fn test_failed_load_keeps_previous_snapshot() {
        let mut cache = CategoryCache::new();
        cache.apply_load::<String>(Ok(sample_snapshot())).unwrap();
        let result = cache.apply_load(Err("network down".to_string()));
        assert_eq!(result, Err("network down".to_string()));
        assert_eq!(cache.snapshot(), Some(&sample_snapshot()));
        assert!(cache.is_loaded());
    }

    #[test]
    fn test_empty_cache_has_no_children() {
        let cache = CategoryCache::new();
        assert!(!cache.is_loaded());
        assert_eq!(cache.snapshot(), None);
    }

    #[test]
    fn test_parent_id_wire_name() {
        let json = serde_json::to_value(item("i1", "Rice", Some("d1"))).unwrap();
        assert_eq!(json["parentId"], "d1");
        let json = serde_json::to_value(item("d1", "Agri", None)).unwrap();
        assert!(json.get("parentId").is_none());
    }
}
