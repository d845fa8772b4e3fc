use contracts::shared::contact_list::{ContactListQuery, DEFAULT_PAGE_SIZE};
use leptos::prelude::*;

/// Filter, sort and paging state of the directory view
#[derive(Clone, Debug, PartialEq)]
pub struct ContactListState {
    pub query: ContactListQuery,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for ContactListState {
    fn default() -> Self {
        Self {
            query: ContactListQuery::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ContactListState {
    /// Clicking the active column flips the direction, another column
    /// starts ascending
    pub fn toggle_sort(&mut self, field: &str) {
        if self.query.sort_field == field {
            self.query.sort_direction = self.query.sort_direction.toggled();
        } else {
            self.query.sort_field = field.to_string();
            self.query.sort_direction = Default::default();
        }
    }
}

pub fn create_state() -> RwSignal<ContactListState> {
    RwSignal::new(ContactListState::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::contact_list::SortDirection;

    #[test]
    fn test_toggle_sort() {
        let mut state = ContactListState::default();
        state.toggle_sort("fullName");
        assert_eq!(state.query.sort_direction, SortDirection::Desc);
        state.toggle_sort("department");
        assert_eq!(state.query.sort_field, "department");
        assert_eq!(state.query.sort_direction, SortDirection::Asc);
    }
}
