//! Search, filter, sort and paginate a directory listing.
//!
//! `apply` is a pure function of its arguments. The frontend runs it over the
//! full contact list; the backend runs the same code for
//! `GET /api/contacts/list`, so every filter is evaluated before paging.

use feruca::Collator;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Filter value meaning "no filter"
pub const ALL: &str = "all";

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// What the engine needs to know about a listed record
pub trait DirectoryRecord {
    /// Fields matched case-insensitively by the search term
    fn search_fields(&self) -> [&str; 4];

    /// Phone number matched verbatim by the search term
    fn phone(&self) -> &str;

    fn status(&self) -> &str;

    fn kind(&self) -> &str;

    /// String form of a sortable field. `None` sorts as an empty string.
    fn field_text(&self, field: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Anything other than "desc" is ascending
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Filter and sort state of the directory view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactListQuery {
    pub search_term: String,
    pub status_filter: String,
    pub type_filter: String,
    pub sort_field: String,
    pub sort_direction: SortDirection,
}

impl Default for ContactListQuery {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            status_filter: ALL.to_string(),
            type_filter: ALL.to_string(),
            sort_field: "fullName".to_string(),
            sort_direction: SortDirection::Asc,
        }
    }
}

/// One visible page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPage<T> {
    pub items: Vec<T>,
    /// 1-based page that was served
    pub page: usize,
    pub page_size: usize,
    /// Records left after filtering, across all pages
    pub total_count: usize,
    pub total_pages: usize,
}

/// Query string of `GET /api/contacts/list`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ContactListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub contact_type: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ContactListParams {
    pub fn to_query(&self) -> ContactListQuery {
        let defaults = ContactListQuery::default();
        ContactListQuery {
            search_term: self.search.clone().unwrap_or_default(),
            status_filter: self.status.clone().unwrap_or(defaults.status_filter),
            type_filter: self.contact_type.clone().unwrap_or(defaults.type_filter),
            sort_field: self
                .sort_field
                .clone()
                .filter(|f| !f.trim().is_empty())
                .unwrap_or(defaults.sort_field),
            sort_direction: self
                .sort_direction
                .as_deref()
                .map(SortDirection::parse)
                .unwrap_or_default(),
        }
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}

fn is_all(filter: &str) -> bool {
    let filter = filter.trim();
    filter.is_empty() || filter.eq_ignore_ascii_case(ALL)
}

/// Search term test: lowercase substring on the text fields, raw substring
/// on the phone number. Any hit keeps the record.
pub fn matches_search<T: DirectoryRecord>(record: &T, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
        || record.phone().contains(term)
}

/// Filter and sort without paging
pub fn filter_and_sort<T: DirectoryRecord + Clone>(records: &[T], query: &ContactListQuery) -> Vec<T> {
    let status = query.status_filter.trim().to_lowercase();
    let kind = query.type_filter.trim().to_lowercase();

    let mut filtered: Vec<T> = records
        .iter()
        .filter(|r| matches_search(*r, &query.search_term))
        .filter(|r| is_all(&status) || r.status().to_lowercase() == status)
        .filter(|r| is_all(&kind) || r.kind().to_lowercase() == kind)
        .cloned()
        .collect();

    let field = query.sort_field.as_str();
    let direction = query.sort_direction;
    let mut collator = Collator::default();
    // Stable sort: equal keys keep their input order in both directions.
    filtered.sort_by(|a, b| {
        let ordering = compare_field(&mut collator, a, b, field);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    filtered
}

/// Unicode collation of the lowercased field text, so accented letters sort
/// next to their base letter
fn compare_field<T: DirectoryRecord>(collator: &mut Collator, a: &T, b: &T, field: &str) -> Ordering {
    let left = a.field_text(field).unwrap_or_default().to_lowercase();
    let right = b.field_text(field).unwrap_or_default().to_lowercase();
    if left == right {
        return Ordering::Equal;
    }
    collator.collate(left.as_str(), right.as_str())
}

/// Number of pages needed for `count` records
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Filter, sort and cut out page `page` (1-based). Page 0 is read as page 1
/// and a page size of 0 as 1.
pub fn apply<T: DirectoryRecord + Clone>(
    records: &[T],
    query: &ContactListQuery,
    page: usize,
    page_size: usize,
) -> ContactPage<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let filtered = filter_and_sort(records, query);
    let total_count = filtered.len();

    let start = (page - 1).saturating_mul(page_size);
    let items = if start >= total_count {
        Vec::new()
    } else {
        let end = (start + page_size).min(total_count);
        filtered[start..end].to_vec()
    };

    ContactPage {
        items,
        page,
        page_size,
        total_count,
        total_pages: total_pages(total_count, page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a004_contact::aggregate::{
        CategoryNames, Contact, ContactDto, ContactStatus, ContactType,
    };

    fn contact(name: &str, department: &str, status: ContactStatus) -> Contact {
        let dto = ContactDto {
            full_name: name.into(),
            official_email: format!("{}@agri.gov.lk", name.to_lowercase().replace(' ', ".")),
            contact_status: status,
            ..Default::default()
        };
        Contact::new_for_insert(
            &dto,
            CategoryNames {
                department: department.into(),
                ..Default::default()
            },
        )
    }

    fn names(page: &[Contact]) -> Vec<&str> {
        page.iter().map(|c| c.full_name.as_str()).collect()
    }

    fn directory() -> Vec<Contact> {
        let mut list = vec![
            contact("Amal Perera", "Agriculture", ContactStatus::Active),
            contact("Kamala Fernando", "Irrigation", ContactStatus::Inactive),
            contact("Sunil Jayasuriya", "Agriculture", ContactStatus::Active),
            contact("Dilani Wickrama", "Export Crops", ContactStatus::Active),
            contact("Ruwan Bandara", "Irrigation", ContactStatus::Active),
        ];
        list[1].contact_type = ContactType::Student;
        list[3].mobile_no1 = "0771234567".into();
        list[4].designation = "Research Officer".into();
        list
    }

    #[test]
    fn test_end_to_end_status_filter_and_sort() {
        let contacts = vec![
            contact("B", "X", ContactStatus::Active),
            contact("A", "Y", ContactStatus::Inactive),
        ];
        let query = ContactListQuery {
            status_filter: "Active".into(),
            sort_field: "fullName".into(),
            sort_direction: SortDirection::Asc,
            ..Default::default()
        };
        let page = apply(&contacts, &query, 1, 10);
        assert_eq!(names(&page.items), vec!["B"]);
        assert_eq!(page.total_count, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let query = ContactListQuery {
            search_term: "PERERA".into(),
            ..Default::default()
        };
        let page = apply(&directory(), &query, 1, 10);
        assert_eq!(names(&page.items), vec!["Amal Perera"]);
    }

    #[test]
    fn test_search_is_or_across_fields() {
        let list = directory();
        let by_department = ContactListQuery {
            search_term: "irrigation".into(),
            ..Default::default()
        };
        assert_eq!(
            names(&apply(&list, &by_department, 1, 10).items),
            vec!["Kamala Fernando", "Ruwan Bandara"]
        );

        let by_designation = ContactListQuery {
            search_term: "research".into(),
            ..Default::default()
        };
        assert_eq!(names(&apply(&list, &by_designation, 1, 10).items), vec!["Ruwan Bandara"]);

        let by_phone = ContactListQuery {
            search_term: "1234".into(),
            ..Default::default()
        };
        assert_eq!(names(&apply(&list, &by_phone, 1, 10).items), vec!["Dilani Wickrama"]);

        let by_email = ContactListQuery {
            search_term: "SUNIL.JAYA".into(),
            ..Default::default()
        };
        assert_eq!(names(&apply(&list, &by_email, 1, 10).items), vec!["Sunil Jayasuriya"]);
    }

    #[test]
    fn test_status_and_type_filters_ignore_case() {
        let list = directory();
        let active = ContactListQuery {
            status_filter: "active".into(),
            ..Default::default()
        };
        assert_eq!(apply(&list, &active, 1, 10).total_count, 4);

        let students = ContactListQuery {
            type_filter: "STUDENT".into(),
            ..Default::default()
        };
        assert_eq!(names(&apply(&list, &students, 1, 10).items), vec!["Kamala Fernando"]);

        let nothing = ContactListQuery {
            status_filter: "inactive".into(),
            type_filter: "staff".into(),
            ..Default::default()
        };
        assert!(apply(&list, &nothing, 1, 10).items.is_empty());
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let list = directory();
        let query = ContactListQuery {
            search_term: "a".into(),
            status_filter: "Active".into(),
            sort_direction: SortDirection::Desc,
            ..Default::default()
        };
        let once = filter_and_sort(&list, &query);
        let twice = filter_and_sort(&once, &query);
        assert_eq!(once, twice);
        assert_eq!(apply(&list, &query, 1, 2), apply(&list, &query, 1, 2));
    }

    #[test]
    fn test_descending_is_reversed_ascending() {
        let list = directory();
        let asc = ContactListQuery::default();
        let desc = ContactListQuery {
            sort_direction: SortDirection::Desc,
            ..Default::default()
        };
        let mut ascending = filter_and_sort(&list, &asc);
        ascending.reverse();
        assert_eq!(ascending, filter_and_sort(&list, &desc));
    }

    #[test]
    fn test_accented_names_sort_with_their_base_letter() {
        let list = vec![
            contact("Zoe Silva", "X", ContactStatus::Active),
            contact("Émile Perera", "X", ContactStatus::Active),
            contact("Ananda", "X", ContactStatus::Active),
            contact("Élan Dias", "X", ContactStatus::Active),
        ];
        let asc = filter_and_sort(&list, &ContactListQuery::default());
        assert_eq!(names(&asc), vec!["Ananda", "Élan Dias", "Émile Perera", "Zoe Silva"]);

        let desc = ContactListQuery {
            sort_direction: SortDirection::Desc,
            ..Default::default()
        };
        assert_eq!(
            names(&filter_and_sort(&list, &desc)),
            vec!["Zoe Silva", "Émile Perera", "Élan Dias", "Ananda"]
        );
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let mut list = directory();
        for c in list.iter_mut() {
            c.designation = "Officer".into();
        }
        let query = ContactListQuery {
            sort_field: "designation".into(),
            ..Default::default()
        };
        let input: Vec<String> = list.iter().map(|c| c.full_name.clone()).collect();
        let sorted: Vec<String> = filter_and_sort(&list, &query)
            .into_iter()
            .map(|c| c.full_name)
            .collect();
        assert_eq!(sorted, input);
    }

    #[test]
    fn test_missing_sort_values_compare_as_empty() {
        let mut list = directory();
        list[2].personal_email = Some("zz@mail.com".into());
        list[0].personal_email = Some("aa@mail.com".into());
        let query = ContactListQuery {
            sort_field: "personalEmail".into(),
            ..Default::default()
        };
        let sorted = filter_and_sort(&list, &query);
        // Records without a personal email keep input order at the front
        assert_eq!(
            names(&sorted),
            vec![
                "Kamala Fernando",
                "Dilani Wickrama",
                "Ruwan Bandara",
                "Amal Perera",
                "Sunil Jayasuriya"
            ]
        );
    }

    #[test]
    fn test_pagination_bounds() {
        let list = directory();
        let query = ContactListQuery::default();
        for page_size in 1..=6 {
            for page in 0..=6 {
                let result = apply(&list, &query, page, page_size);
                assert!(result.items.len() <= page_size);
                assert_eq!(result.total_pages, list.len().div_ceil(page_size));
            }
        }
        let second = apply(&list, &query, 2, 2);
        assert_eq!(names(&second.items), vec!["Kamala Fernando", "Ruwan Bandara"]);
        assert!(apply(&list, &query, 4, 2).items.is_empty());
    }

    #[test]
    fn test_zero_page_and_size_are_clamped() {
        let list = directory();
        let result = apply(&list, &ContactListQuery::default(), 0, 0);
        assert_eq!(result.page, 1);
        assert_eq!(result.page_size, 1);
        assert_eq!(names(&result.items), vec!["Amal Perera"]);
        assert_eq!(result.total_pages, 5);
    }

    #[test]
    fn test_empty_input() {
        let result = apply::<Contact>(&[], &ContactListQuery::default(), 1, 10);
        assert!(result.items.is_empty());
        assert_eq!(result.total_pages, 0);
    }

    #[test]
    fn test_params_to_query() {
        let params: ContactListParams = serde_json::from_value(serde_json::json!({
            "search": "perera",
            "type": "Staff",
            "sort_direction": "DESC",
            "page": 3
        }))
        .unwrap();
        let query = params.to_query();
        assert_eq!(query.search_term, "perera");
        assert_eq!(query.status_filter, ALL);
        assert_eq!(query.type_filter, "Staff");
        assert_eq!(query.sort_field, "fullName");
        assert_eq!(query.sort_direction, SortDirection::Desc);
        assert_eq!(params.page(), 3);
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
    }
}
