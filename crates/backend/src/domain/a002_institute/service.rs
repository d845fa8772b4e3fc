use super::repository;
use contracts::domain::a001_department::aggregate::normalize_description;
use contracts::domain::a002_institute::aggregate::{Institute, InstituteDto};
use uuid::Uuid;

use crate::shared::error::ServiceError;

fn validate(aggregate: &Institute) -> Result<(), ServiceError> {
    aggregate.validate().map_err(|e| {
        let field = if aggregate.name.trim().is_empty() {
            "name"
        } else {
            "departmentId"
        };
        ServiceError::invalid(field, e)
    })
}

/// Create an institute; returns the new id
pub async fn create(dto: InstituteDto) -> Result<Uuid, ServiceError> {
    let mut aggregate = Institute::new_for_insert(
        dto.name.trim().to_string(),
        normalize_description(dto.description.as_deref()),
        dto.department_id.trim().to_string(),
    );
    validate(&aggregate)?;
    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Created institute {} ({})", aggregate.name, id);
    Ok(id)
}

pub async fn update(id: Uuid, dto: InstituteDto) -> Result<Institute, ServiceError> {
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;
    aggregate.update(&dto);
    validate(&aggregate)?;
    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Institute>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Institute>> {
    repository::list_all().await
}

pub async fn list_by_department(department_id: &str) -> anyhow::Result<Vec<Institute>> {
    repository::list_by_department(department_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(result: Result<(), ServiceError>) -> String {
        match result {
            Err(ServiceError::Validation(errors)) => errors.keys().next().cloned().unwrap_or_default(),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_validation_field_names() {
        let nameless = Institute::new_for_insert("".into(), None, "d1".into());
        assert_eq!(field_of(validate(&nameless)), "name");

        let orphan = Institute::new_for_insert("Rice Research".into(), None, " ".into());
        assert_eq!(field_of(validate(&orphan)), "departmentId");
    }
}
