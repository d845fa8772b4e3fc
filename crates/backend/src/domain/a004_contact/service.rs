use super::repository;
use contracts::domain::a001_department::aggregate::{Department, DepartmentDto};
use contracts::domain::a002_institute::aggregate::InstituteDto;
use contracts::domain::a003_unit::aggregate::UnitDto;
use contracts::domain::a004_contact::aggregate::{
    CategoryNames, Contact, ContactDto, ContactPatch, ContactStatus, ContactType,
};
use contracts::shared::contact_list::{self, ContactListParams, ContactPage};
use contracts::shared::validation::{validate_contact, ValidationPolicy};
use uuid::Uuid;

use crate::domain::{a001_department, a002_institute, a003_unit, categories};
use crate::shared::config::get_config;
use crate::shared::error::ServiceError;

fn policy() -> ValidationPolicy {
    ValidationPolicy {
        block_on_create: true,
        block_on_update: get_config().validation.block_on_update,
    }
}

fn check(dto: &ContactDto, is_new: bool, policy: ValidationPolicy) -> Result<(), ServiceError> {
    let errors = validate_contact(dto, is_new);
    if policy.blocks(is_new, &errors) {
        return Err(ServiceError::Validation(errors));
    }
    if !errors.is_empty() {
        tracing::warn!(
            "Saving contact {} with validation errors: {:?}",
            dto.id.as_deref().unwrap_or("<new>"),
            errors
        );
    }
    Ok(())
}

/// Display names of the referenced categories
async fn resolve_names(
    department_id: &str,
    institute_id: &str,
    unit_id: &str,
) -> anyhow::Result<CategoryNames> {
    let snapshot = categories::load_snapshot().await?;
    Ok(CategoryNames::resolve(&snapshot, department_id, institute_id, unit_id))
}

/// Create a contact; returns the new id
pub async fn create(dto: ContactDto) -> Result<Uuid, ServiceError> {
    check(&dto, true, policy())?;
    let names = resolve_names(&dto.department_id, &dto.institute_id, &dto.unit_id).await?;
    let mut aggregate = Contact::new_for_insert(&dto, names);
    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Created contact {} ({})", aggregate.full_name, id);
    Ok(id)
}

/// Merge `patch` into the stored contact. The merged record is validated as
/// an existing record.
pub async fn update(id: Uuid, patch: ContactPatch) -> Result<Contact, ServiceError> {
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let refs_changed = aggregate.apply_patch(&patch);
    check(&aggregate.to_dto(), false, policy())?;

    if refs_changed {
        let names = resolve_names(
            &aggregate.department_id,
            &aggregate.institute_id,
            &aggregate.unit_id,
        )
        .await?;
        aggregate.set_category_names(names);
    }

    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Contact>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Contact>> {
    repository::list_all().await
}

/// Equality filter on one reference. The department filter wins when both
/// are given; blank values count as absent.
pub async fn list_filtered(
    department: Option<&str>,
    institute: Option<&str>,
) -> anyhow::Result<Vec<Contact>> {
    let department = department.map(str::trim).filter(|s| !s.is_empty());
    let institute = institute.map(str::trim).filter(|s| !s.is_empty());
    match (department, institute) {
        (Some(department_id), _) => repository::list_by_department(department_id).await,
        (None, Some(institute_id)) => repository::list_by_institute(institute_id).await,
        (None, None) => repository::list_all().await,
    }
}

/// One page of the directory view
pub async fn list_page(params: &ContactListParams) -> anyhow::Result<ContactPage<Contact>> {
    let records = repository::list_all().await?;
    Ok(contact_list::apply(
        &records,
        &params.to_query(),
        params.page(),
        params.page_size(),
    ))
}

/// (status, count) and (type, count) over the whole directory
pub fn tally(contacts: &[Contact]) -> (Vec<(ContactStatus, u64)>, Vec<(ContactType, u64)>) {
    let by_status = ContactStatus::all()
        .into_iter()
        .map(|s| {
            let n = contacts.iter().filter(|c| c.contact_status == s).count() as u64;
            (s, n)
        })
        .collect();
    let by_type = ContactType::all()
        .into_iter()
        .map(|t| {
            let n = contacts.iter().filter(|c| c.contact_type == t).count() as u64;
            (t, n)
        })
        .collect();
    (by_status, by_type)
}

/// Seed a sample department, institute, unit and one contact under them
pub async fn insert_test_data() -> anyhow::Result<Uuid> {
    let existing: Vec<Department> = a001_department::repository::list_all().await?;
    let department_id = match existing.iter().find(|d| d.name == "Department of Agriculture") {
        Some(d) => d.base.id.value(),
        None => a001_department::service::create(DepartmentDto {
            id: None,
            name: "Department of Agriculture".into(),
            description: Some("Head office".into()),
        })
        .await
        .map_err(into_anyhow)?,
    };

    let institute_id = a002_institute::service::create(InstituteDto {
        id: None,
        name: "Rice Research and Development Institute".into(),
        description: None,
        department_id: department_id.to_string(),
    })
    .await
    .map_err(into_anyhow)?;

    let unit_id = a003_unit::service::create(UnitDto {
        id: None,
        name: "Plant Breeding Division".into(),
        description: None,
        institute_id: institute_id.to_string(),
    })
    .await
    .map_err(into_anyhow)?;

    let contact_id = create(ContactDto {
        full_name: "John Doe".into(),
        designation: "Research Officer".into(),
        department_id: department_id.to_string(),
        institute_id: institute_id.to_string(),
        unit_id: unit_id.to_string(),
        official_email: "john.doe@agriculture.gov".into(),
        mobile_no1: "0771234567".into(),
        contact_type: ContactType::Staff,
        contact_status: ContactStatus::Active,
        ..Default::default()
    })
    .await
    .map_err(into_anyhow)?;

    tracing::info!("Inserted test data, contact {}", contact_id);
    Ok(contact_id)
}

fn into_anyhow(e: ServiceError) -> anyhow::Error {
    match e {
        ServiceError::Other(e) => e,
        other => anyhow::anyhow!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(status: ContactStatus, kind: ContactType) -> Contact {
        let mut c = Contact::new_for_insert(
            &ContactDto {
                full_name: "Amal".into(),
                official_email: "amal@agri.gov.lk".into(),
                ..Default::default()
            },
            CategoryNames::default(),
        );
        c.contact_status = status;
        c.contact_type = kind;
        c
    }

    #[test]
    fn test_new_record_errors_always_block() {
        let lenient = ValidationPolicy {
            block_on_create: true,
            block_on_update: false,
        };
        let dto = ContactDto {
            full_name: "".into(),
            official_email: "not-an-email".into(),
            ..Default::default()
        };
        assert!(matches!(check(&dto, true, lenient), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_update_errors_pass_when_policy_is_lenient() {
        let lenient = ValidationPolicy {
            block_on_create: true,
            block_on_update: false,
        };
        let dto = ContactDto {
            full_name: "Amal".into(),
            official_email: "not-an-email".into(),
            ..Default::default()
        };
        assert!(check(&dto, false, lenient).is_ok());
        assert!(check(&dto, false, ValidationPolicy::default()).is_err());
    }

    #[tokio::test]
    async fn test_update_merges_revalidates_and_renames() {
        crate::test_support::database().await;
        let (department_id, institute_id, unit_id) = crate::test_support::hierarchy("Merge").await;
        let id = create(ContactDto {
            full_name: "Nimal Silva".into(),
            official_email: "nimal@agri.gov.lk".into(),
            mobile_no1: "0771234567".into(),
            department_id: department_id.clone(),
            institute_id,
            unit_id,
            ..Default::default()
        })
        .await
        .unwrap();
        let stored = get_by_id(id).await.unwrap().unwrap();
        assert!(stored.department.starts_with("Merge department"));

        let updated = update(
            id,
            ContactPatch {
                designation: Some("Director".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.designation, "Director");
        assert_eq!(updated.full_name, "Nimal Silva");
        assert_eq!(updated.unit, stored.unit);

        let rejected = update(
            id,
            ContactPatch {
                official_email: Some("not-an-email".into()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(rejected, Err(ServiceError::Validation(_))));

        let (other_department, _, _) = crate::test_support::hierarchy("Moved").await;
        let moved = update(
            id,
            ContactPatch {
                department_id: Some(other_department.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(moved.department_id, other_department);
        assert!(moved.department.starts_with("Moved department"));
        assert_eq!((moved.institute_id.as_str(), moved.unit.as_str()), ("", ""));

        let reloaded = get_by_id(id).await.unwrap().unwrap();
        assert_eq!(reloaded.official_email, "nimal@agri.gov.lk");
        assert_eq!(reloaded.department_id, other_department);
    }

    #[test]
    fn test_tally_counts_every_bucket() {
        let contacts = vec![
            contact(ContactStatus::Active, ContactType::Staff),
            contact(ContactStatus::Active, ContactType::Student),
            contact(ContactStatus::Inactive, ContactType::Staff),
        ];
        let (by_status, by_type) = tally(&contacts);
        assert_eq!(by_status, vec![(ContactStatus::Active, 2), (ContactStatus::Inactive, 1)]);
        assert_eq!(
            by_type,
            vec![
                (ContactType::Staff, 2),
                (ContactType::Student, 1),
                (ContactType::External, 0)
            ]
        );
    }
}
