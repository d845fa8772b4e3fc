use anyhow::Result;
use contracts::dashboards::d400_directory_summary::{CountRow, DirectorySummaryResponse};
use contracts::domain::a004_contact::aggregate::Contact;

use crate::domain::{a001_department, a002_institute, a003_unit, a004_contact};
use crate::system::users::repository as users_repository;

/// Counters for the dashboard page
pub async fn get_directory_summary() -> Result<DirectorySummaryResponse> {
    let (contacts, departments, institutes, units, users) = tokio::try_join!(
        a004_contact::repository::list_all(),
        a001_department::repository::count(),
        a002_institute::repository::count(),
        a003_unit::repository::count(),
        users_repository::count_users(),
    )?;

    Ok(build_summary(&contacts, departments, institutes, units, users))
}

fn build_summary(
    contacts: &[Contact],
    departments: u64,
    institutes: u64,
    units: u64,
    users: u64,
) -> DirectorySummaryResponse {
    let (by_status, by_type) = a004_contact::service::tally(contacts);
    DirectorySummaryResponse {
        total_contacts: contacts.len() as u64,
        by_status: by_status
            .into_iter()
            .map(|(status, count)| CountRow {
                label: status.as_str().to_string(),
                count,
            })
            .collect(),
        by_type: by_type
            .into_iter()
            .map(|(kind, count)| CountRow {
                label: kind.as_str().to_string(),
                count,
            })
            .collect(),
        departments,
        institutes,
        units,
        users,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a004_contact::aggregate::{CategoryNames, ContactDto, ContactStatus};

    #[test]
    fn test_summary_includes_zero_rows() {
        let mut retired = Contact::new_for_insert(
            &ContactDto {
                full_name: "Sunil".into(),
                ..Default::default()
            },
            CategoryNames::default(),
        );
        retired.contact_status = ContactStatus::Inactive;

        let summary = build_summary(&[retired], 2, 3, 4, 1);
        assert_eq!(summary.total_contacts, 1);
        assert_eq!(summary.status_count("Active"), 0);
        assert_eq!(summary.status_count("Inactive"), 1);
        assert_eq!(summary.by_type.len(), 3);
        assert_eq!(summary.units, 4);
    }
}
