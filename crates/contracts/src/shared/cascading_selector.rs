//! Department → institute → unit selection state for forms.
//!
//! Changing an ancestor clears every dependent selection. The eligible option
//! list for a level is filtered by its parent selection, and falls back to the
//! full list while the parent is unset. Picking from such an unfiltered list
//! with `pick_institute`/`pick_unit` backfills the missing ancestors from the
//! item's parent link, so the selection stays consistent.

use serde::{Deserialize, Serialize};

use super::category_cache::{CategoryItem, CategorySnapshot};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadingSelection {
    department: Option<String>,
    institute: Option<String>,
    unit: Option<String>,
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CascadingSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a stored record without clearing anything (edit forms).
    pub fn from_record(department: &str, institute: &str, unit: &str) -> Self {
        Self {
            department: normalize(Some(department.to_string())),
            institute: normalize(Some(institute.to_string())),
            unit: normalize(Some(unit.to_string())),
        }
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    pub fn institute(&self) -> Option<&str> {
        self.institute.as_deref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Set the department; institute and unit are always cleared.
    pub fn set_department(&mut self, value: Option<String>) {
        self.department = normalize(value);
        self.institute = None;
        self.unit = None;
    }

    /// Set the institute; unit is always cleared.
    pub fn set_institute(&mut self, value: Option<String>) {
        self.institute = normalize(value);
        self.unit = None;
    }

    pub fn set_unit(&mut self, value: Option<String>) {
        self.unit = normalize(value);
    }

    /// Select an institute from `eligible_institutes`. When no department is
    /// selected yet, the institute's own department is filled in.
    pub fn pick_institute(&mut self, snapshot: &CategorySnapshot, value: Option<String>) {
        let value = normalize(value);
        if self.department.is_none() {
            let parent = value.as_deref().and_then(|id| parent_of(&snapshot.institutes, id));
            self.department = parent;
        }
        self.set_institute(value);
    }

    /// Select a unit from `eligible_units`, backfilling institute and
    /// department when they are unset.
    pub fn pick_unit(&mut self, snapshot: &CategorySnapshot, value: Option<String>) {
        let value = normalize(value);
        if self.institute.is_none() {
            if let Some(institute) = value.as_deref().and_then(|id| parent_of(&snapshot.units, id)) {
                self.pick_institute(snapshot, Some(institute));
            }
        }
        self.set_unit(value);
    }

    /// Unit requires institute, institute requires department.
    pub fn is_consistent(&self) -> bool {
        (self.unit.is_none() || self.institute.is_some())
            && (self.institute.is_none() || self.department.is_some())
    }

    /// Institutes under the selected department, or all of them when no
    /// department is selected.
    pub fn eligible_institutes<'a>(&self, snapshot: &'a CategorySnapshot) -> Vec<&'a CategoryItem> {
        match self.department.as_deref() {
            Some(department_id) => snapshot.institutes_of(department_id),
            None => snapshot.institutes.iter().collect(),
        }
    }

    /// Units under the selected institute, or all of them when no institute
    /// is selected.
    pub fn eligible_units<'a>(&self, snapshot: &'a CategorySnapshot) -> Vec<&'a CategoryItem> {
        match self.institute.as_deref() {
            Some(institute_id) => snapshot.units_of(institute_id),
            None => snapshot.units.iter().collect(),
        }
    }

    /// Ids as form strings (empty when unset)
    pub fn to_form_values(&self) -> (String, String, String) {
        (
            self.department.clone().unwrap_or_default(),
            self.institute.clone().unwrap_or_default(),
            self.unit.clone().unwrap_or_default(),
        )
    }
}

fn parent_of(items: &[CategoryItem], id: &str) -> Option<String> {
    items
        .iter()
        .find(|item| item.id == id)
        .and_then(|item| item.parent_id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::category_cache::tests::sample_snapshot;

    fn ids(items: Vec<&CategoryItem>) -> Vec<&str> {
        items.into_iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_department_change_resets_institute_and_unit() {
        let mut sel = CascadingSelection::new();
        sel.set_department(Some("d1".into()));
        sel.set_institute(Some("i1".into()));
        sel.set_unit(Some("u1".into()));
        sel.set_department(Some("d2".into()));
        assert_eq!(sel.department(), Some("d2"));
        assert_eq!(sel.institute(), None);
        assert_eq!(sel.unit(), None);
    }

    #[test]
    fn test_reselecting_same_department_still_resets() {
        let mut sel = CascadingSelection::from_record("d1", "i1", "u1");
        sel.set_department(Some("d1".into()));
        assert_eq!(sel.institute(), None);
        assert_eq!(sel.unit(), None);
    }

    #[test]
    fn test_institute_change_resets_unit_only() {
        let mut sel = CascadingSelection::from_record("d1", "i1", "u1");
        sel.set_institute(Some("i2".into()));
        assert_eq!(sel.department(), Some("d1"));
        assert_eq!(sel.institute(), Some("i2"));
        assert_eq!(sel.unit(), None);
    }

    #[test]
    fn test_unit_change_touches_nothing_else() {
        let mut sel = CascadingSelection::from_record("d1", "i1", "u1");
        sel.set_unit(Some("u2".into()));
        assert_eq!(sel.to_form_values(), ("d1".into(), "i1".into(), "u2".into()));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let mut sel = CascadingSelection::new();
        sel.set_department(Some("  ".into()));
        assert_eq!(sel.department(), None);
    }

    #[test]
    fn test_eligible_institutes_follow_department() {
        let snapshot = sample_snapshot();
        let mut sel = CascadingSelection::new();
        sel.set_department(Some("d2".into()));
        assert_eq!(ids(sel.eligible_institutes(&snapshot)), vec!["i3"]);
    }

    #[test]
    fn test_eligible_lists_fall_back_to_everything_when_parent_unset() {
        let snapshot = sample_snapshot();
        let sel = CascadingSelection::new();
        assert_eq!(ids(sel.eligible_institutes(&snapshot)), vec!["i1", "i2", "i3"]);
        assert_eq!(ids(sel.eligible_units(&snapshot)), vec!["u1", "u2", "u3"]);
    }

    #[test]
    fn test_eligible_units_follow_institute() {
        let snapshot = sample_snapshot();
        let sel = CascadingSelection::from_record("d1", "i1", "");
        assert_eq!(ids(sel.eligible_units(&snapshot)), vec!["u1", "u2"]);
    }

    #[test]
    fn test_transitions_keep_invariant() {
        let mut sel = CascadingSelection::new();
        sel.set_department(Some("d1".into()));
        assert!(sel.is_consistent());
        sel.set_institute(Some("i1".into()));
        sel.set_unit(Some("u1".into()));
        assert!(sel.is_consistent());
        sel.set_department(None);
        assert!(sel.is_consistent());
        assert_eq!(sel.to_form_values(), (String::new(), String::new(), String::new()));
    }

    #[test]
    fn test_pick_unit_backfills_ancestors() {
        let snapshot = sample_snapshot();
        let mut sel = CascadingSelection::new();
        sel.pick_unit(&snapshot, Some("u3".into()));
        assert_eq!(sel.to_form_values(), ("d2".into(), "i3".into(), "u3".into()));
        assert!(sel.is_consistent());
    }

    #[test]
    fn test_pick_institute_keeps_chosen_department() {
        let snapshot = sample_snapshot();
        let mut sel = CascadingSelection::new();
        sel.set_department(Some("d1".into()));
        sel.pick_institute(&snapshot, Some("i2".into()));
        assert_eq!(sel.department(), Some("d1"));
        assert_eq!(sel.institute(), Some("i2"));
    }

    #[test]
    fn test_legacy_record_can_be_inconsistent() {
        let sel = CascadingSelection::from_record("", "i1", "u1");
        assert!(!sel.is_consistent());
    }
}
