use anyhow::{anyhow, Result};
use chrono::Utc;
use contracts::shared::validation::validate_user;
use contracts::system::users::{ChangePasswordDto, SystemUser, SystemUserDto, UserRole};

use super::repository;
use crate::shared::error::ServiceError;
use crate::shared::storage::{self, BlobStore};
use crate::system::auth::password;

/// Result of a login attempt
#[derive(Debug)]
pub enum LoginOutcome {
    Success(SystemUser),
    InvalidCredentials,
    Disabled,
}

/// Picture field of the form: `data:` URLs are stored and replaced by their
/// public URL, anything else is kept as given.
async fn resolve_picture(
    store: &dyn BlobStore,
    value: &str,
    email: &str,
) -> Result<Option<String>, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.starts_with("data:") {
        let url = storage::store_profile_data_url(store, value, email).await?;
        return Ok(Some(url));
    }
    Ok(Some(value.to_string()))
}

async fn ensure_email_free(email: &str, own_id: Option<&str>) -> Result<(), ServiceError> {
    if let Some(existing) = repository::get_by_email(email).await? {
        if Some(existing.uid.as_str()) != own_id {
            return Err(ServiceError::invalid("email", "Email is already registered"));
        }
    }
    Ok(())
}

/// Create a user; returns the new id
pub async fn create(dto: SystemUserDto, store: &dyn BlobStore) -> Result<String, ServiceError> {
    let errors = validate_user(&dto, true);
    if !errors.is_empty() {
        return Err(ServiceError::Validation(errors));
    }

    let email = dto.email.trim().to_lowercase();
    ensure_email_free(&email, None).await?;

    let raw_password = dto.password.as_deref().unwrap_or_default();
    password::validate_password_strength(raw_password)?;
    let password_hash = password::hash_password(raw_password)?;

    let now = Utc::now().to_rfc3339();
    let user = SystemUser {
        uid: uuid::Uuid::new_v4().to_string(),
        profile_picture: resolve_picture(store, &dto.profile_picture, &email).await?,
        email,
        full_name: dto.full_name.trim().to_string(),
        designation: dto.designation.trim().to_string(),
        department_id: dto.department_id.trim().to_string(),
        institute_id: dto.institute_id.trim().to_string(),
        unit_id: dto.unit_id.trim().to_string(),
        contact_number: dto.contact_number.trim().to_string(),
        role: dto.role,
        is_active: dto.is_active,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };

    repository::create_with_password(&user, &password_hash).await?;
    tracing::info!("Created user {} ({})", user.email, user.role);
    Ok(user.uid)
}

/// Replace the profile of an existing user. A non-empty password is changed too.
pub async fn update(id: &str, dto: SystemUserDto, store: &dyn BlobStore) -> Result<SystemUser, ServiceError> {
    let errors = validate_user(&dto, false);
    if !errors.is_empty() {
        return Err(ServiceError::Validation(errors));
    }

    let mut user = repository::get_by_id(id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    let email = dto.email.trim().to_lowercase();
    if email != user.email {
        ensure_email_free(&email, Some(id)).await?;
    }

    user.profile_picture = resolve_picture(store, &dto.profile_picture, &email).await?;
    user.email = email;
    user.full_name = dto.full_name.trim().to_string();
    user.designation = dto.designation.trim().to_string();
    user.department_id = dto.department_id.trim().to_string();
    user.institute_id = dto.institute_id.trim().to_string();
    user.unit_id = dto.unit_id.trim().to_string();
    user.contact_number = dto.contact_number.trim().to_string();
    user.role = dto.role;
    user.is_active = dto.is_active;
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(&user).await?;

    if let Some(new_password) = dto.password.as_deref().filter(|p| !p.is_empty()) {
        password::validate_password_strength(new_password)?;
        repository::update_password(id, &password::hash_password(new_password)?).await?;
    }

    Ok(user)
}

pub async fn delete(id: &str) -> Result<bool> {
    repository::delete(id).await
}

pub async fn get_by_id(id: &str) -> Result<Option<SystemUser>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> Result<Vec<SystemUser>> {
    repository::list_all().await
}

/// Change a password. Users changing their own password must give the old
/// one; administrators may reset anyone else's.
pub async fn change_password(
    user_id: &str,
    dto: ChangePasswordDto,
    requester_id: &str,
    requester_role: UserRole,
) -> Result<(), ServiceError> {
    repository::get_by_id(user_id)
        .await?
        .ok_or(ServiceError::NotFound)?;

    if user_id == requester_id {
        let old_password = dto
            .old_password
            .as_deref()
            .ok_or_else(|| ServiceError::invalid("oldPassword", "Current password is required"))?;
        let current_hash = repository::get_password_hash(user_id)
            .await?
            .ok_or_else(|| anyhow!("Password hash not found"))?;
        if !password::verify_password(old_password, &current_hash)? {
            return Err(ServiceError::invalid("oldPassword", "Current password is incorrect"));
        }
    } else if !requester_role.can_manage_users() {
        return Err(ServiceError::Forbidden);
    }

    if password::validate_password_strength(&dto.new_password).is_err() {
        return Err(ServiceError::invalid("newPassword", "Password must be at least 6 characters"));
    }
    repository::update_password(user_id, &password::hash_password(&dto.new_password)?).await?;
    tracing::info!("Password changed for user {}", user_id);
    Ok(())
}

/// Check a login. Unknown email and wrong password look the same.
pub async fn verify_credentials(email: &str, password: &str) -> Result<LoginOutcome> {
    let user = match repository::get_by_email(email).await? {
        Some(u) => u,
        None => return Ok(LoginOutcome::InvalidCredentials),
    };

    let password_hash = repository::get_password_hash(&user.uid)
        .await?
        .ok_or_else(|| anyhow!("Password hash not found"))?;

    if !password::verify_password(password, &password_hash)? {
        return Ok(LoginOutcome::InvalidCredentials);
    }

    if !user.is_active {
        return Ok(LoginOutcome::Disabled);
    }

    if let Err(e) = repository::update_last_login(&user.uid).await {
        tracing::warn!("Failed to record last login for {}: {}", user.email, e);
    }

    Ok(LoginOutcome::Success(user))
}
