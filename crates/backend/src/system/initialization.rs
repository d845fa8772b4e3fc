use anyhow::Result;
use contracts::system::users::{SystemUserDto, UserRole};

use crate::shared::storage::get_store;
use crate::system::users::{repository, service};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@agri.local";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Create the default administrator when `sys_users` is empty
pub async fn ensure_admin_user_exists() -> Result<()> {
    if repository::count_users().await? > 0 {
        return Ok(());
    }

    tracing::info!("No users found. Creating default admin user...");

    let admin = SystemUserDto {
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        password: Some(DEFAULT_ADMIN_PASSWORD.to_string()),
        full_name: "Administrator".to_string(),
        designation: "System Administrator".to_string(),
        role: UserRole::Admin,
        ..Default::default()
    };

    let admin_id = service::create(admin, get_store())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create default admin: {}", e))?;

    tracing::warn!("Default admin user created ({})", admin_id);
    tracing::warn!("  Email:    {}", DEFAULT_ADMIN_EMAIL);
    tracing::warn!("  Password: {}", DEFAULT_ADMIN_PASSWORD);
    tracing::warn!("  Change the password after the first sign-in.");

    Ok(())
}
