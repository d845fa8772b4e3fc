use super::repository;
use contracts::domain::a001_department::aggregate::normalize_description;
use contracts::domain::a003_unit::aggregate::{Unit, UnitDto};
use uuid::Uuid;

use crate::shared::error::ServiceError;

fn validate(aggregate: &Unit) -> Result<(), ServiceError> {
    aggregate.validate().map_err(|e| {
        let field = if aggregate.name.trim().is_empty() {
            "name"
        } else {
            "instituteId"
        };
        ServiceError::invalid(field, e)
    })
}

pub async fn create(dto: UnitDto) -> Result<Uuid, ServiceError> {
    let mut aggregate = Unit::new_for_insert(
        dto.name.trim().to_string(),
        normalize_description(dto.description.as_deref()),
        dto.institute_id.trim().to_string(),
    );
    validate(&aggregate)?;
    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Created unit {} ({})", aggregate.name, id);
    Ok(id)
}

pub async fn update(id: Uuid, dto: UnitDto) -> Result<Unit, ServiceError> {
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

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Unit>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Unit>> {
    repository::list_all().await
}

pub async fn list_by_institute(institute_id: &str) -> anyhow::Result<Vec<Unit>> {
    repository::list_by_institute(institute_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_without_institute_is_an_institute_error() {
        let unit = Unit::new_for_insert("Plant Breeding Division".into(), None, "".into());
        match validate(&unit) {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.get("instituteId").map(String::as_str), Some("Institute is required"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
