//! Console account endpoints. Responses come in the `{success, data|error}`
//! envelope.

use contracts::shared::api_response::ApiResponse;
use contracts::system::users::{ChangePasswordDto, SystemUser, SystemUserDto};
use serde::Deserialize;
use serde_json::Value;

use crate::shared::api_utils::{self, ApiFailure};

#[derive(Debug, Deserialize)]
struct Created {
    uid: String,
}

fn unwrap<T>(response: ApiResponse<T>) -> Result<T, ApiFailure> {
    response.into_result().map_err(ApiFailure::Message)
}

pub async fn fetch_users() -> Result<Vec<SystemUser>, ApiFailure> {
    unwrap(api_utils::get_json("/api/system/users").await?)
}

/// Returns the uid of the new account
pub async fn create_user(dto: &SystemUserDto) -> Result<String, ApiFailure> {
    let created: Created = unwrap(api_utils::post_json("/api/system/users", dto).await?)?;
    Ok(created.uid)
}

pub async fn update_user(uid: &str, dto: &SystemUserDto) -> Result<SystemUser, ApiFailure> {
    unwrap(api_utils::put_json(&format!("/api/system/users/{}", uid), dto).await?)
}

pub async fn delete_user(uid: &str) -> Result<(), ApiFailure> {
    api_utils::delete(&format!("/api/system/users/{}", uid)).await
}

pub async fn change_password(uid: &str, dto: &ChangePasswordDto) -> Result<(), ApiFailure> {
    let _: Value = unwrap(
        api_utils::post_json(&format!("/api/system/users/{}/change-password", uid), dto).await?,
    )?;
    Ok(())
}
