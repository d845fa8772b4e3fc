use super::repository;
use contracts::domain::a001_department::aggregate::{normalize_description, Department, DepartmentDto};
use uuid::Uuid;

use crate::shared::error::ServiceError;

fn validate(aggregate: &Department) -> Result<(), ServiceError> {
    aggregate
        .validate()
        .map_err(|e| ServiceError::invalid("name", e))
}

/// Create a department; returns the new id
pub async fn create(dto: DepartmentDto) -> Result<Uuid, ServiceError> {
    let mut aggregate = Department::new_for_insert(
        dto.name.trim().to_string(),
        normalize_description(dto.description.as_deref()),
    );
    validate(&aggregate)?;
    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Created department {} ({})", aggregate.name, id);
    Ok(id)
}

pub async fn update(id: Uuid, dto: DepartmentDto) -> Result<Department, ServiceError> {
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;
    aggregate.update(&dto);
    validate(&aggregate)?;
    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

/// Hard delete. Institutes that reference the department are left as they are.
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Department>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Department>> {
    repository::list_all().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_a_name_error() {
        let aggregate = Department::new_for_insert("  ".into(), None);
        match validate(&aggregate) {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.get("name").map(String::as_str), Some("Department name is required"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
