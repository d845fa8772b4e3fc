use contracts::domain::a004_contact::aggregate::{Contact, ContactDto, ContactPatch};
use serde::Deserialize;

use crate::shared::api_utils::{self, ApiFailure};

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

/// Whole directory; the list page filters and pages it locally
pub async fn fetch_all() -> Result<Vec<Contact>, ApiFailure> {
    api_utils::get_json("/api/contacts").await
}

pub async fn fetch_by_id(id: &str) -> Result<Contact, ApiFailure> {
    api_utils::get_json(&format!("/api/contacts/{}", id)).await
}

/// Returns the id of the new contact
pub async fn create(dto: &ContactDto) -> Result<String, ApiFailure> {
    let created: Created = api_utils::post_json("/api/contacts", dto).await?;
    Ok(created.id)
}

pub async fn update(id: &str, patch: &ContactPatch) -> Result<Contact, ApiFailure> {
    api_utils::put_json(&format!("/api/contacts/{}", id), patch).await
}

pub async fn delete(id: &str) -> Result<(), ApiFailure> {
    api_utils::delete(&format!("/api/contacts/{}", id)).await
}

pub async fn fill_test_data() -> Result<(), ApiFailure> {
    api_utils::post_empty("/api/contacts/testdata").await
}
