use anyhow::{Context, Result};
use contracts::system::users::{SystemUser, UserRole};
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

const USER_COLUMNS: &str = "id, email, full_name, designation, department_id, institute_id, unit_id, \
     contact_number, role, is_active, profile_picture, created_at, updated_at, last_login_at";

fn row_to_user(row: &QueryResult) -> Result<SystemUser> {
    let role: String = row.try_get("", "role")?;
    Ok(SystemUser {
        uid: row.try_get("", "id")?,
        email: row.try_get("", "email")?,
        full_name: row.try_get("", "full_name")?,
        designation: row.try_get("", "designation")?,
        department_id: row.try_get("", "department_id")?,
        institute_id: row.try_get("", "institute_id")?,
        unit_id: row.try_get("", "unit_id")?,
        contact_number: row.try_get("", "contact_number")?,
        role: UserRole::from_str_lenient(&role),
        is_active: row.try_get::<i32>("", "is_active")? != 0,
        profile_picture: row.try_get("", "profile_picture")?,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
    })
}

async fn query_one_user(sql: String, values: Vec<Value>) -> Result<Option<SystemUser>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(DatabaseBackend::Sqlite, &sql, values))
        .await?;
    row.as_ref().map(row_to_user).transpose()
}

/// Insert a user together with its password hash
pub async fn create_with_password(user: &SystemUser, password_hash: &str) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT INTO sys_users (id, email, password_hash, full_name, designation, department_id,
                 institute_id, unit_id, contact_number, role, is_active, profile_picture,
                 created_at, updated_at, last_login_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            [
                user.uid.clone().into(),
                user.email.clone().into(),
                password_hash.to_string().into(),
                user.full_name.clone().into(),
                user.designation.clone().into(),
                user.department_id.clone().into(),
                user.institute_id.clone().into(),
                user.unit_id.clone().into(),
                user.contact_number.clone().into(),
                user.role.as_str().into(),
                (if user.is_active { 1 } else { 0 }).into(),
                user.profile_picture.clone().into(),
                user.created_at.clone().into(),
                user.updated_at.clone().into(),
                user.last_login_at.clone().into(),
            ],
        ))
        .await
        .context("Failed to insert user")?;
    Ok(())
}

pub async fn get_by_id(id: &str) -> Result<Option<SystemUser>> {
    query_one_user(
        format!("SELECT {} FROM sys_users WHERE id = ?", USER_COLUMNS),
        vec![id.into()],
    )
    .await
}

/// Lookup is case-insensitive
pub async fn get_by_email(email: &str) -> Result<Option<SystemUser>> {
    query_one_user(
        format!("SELECT {} FROM sys_users WHERE lower(email) = lower(?)", USER_COLUMNS),
        vec![email.trim().into()],
    )
    .await
}

pub async fn get_password_hash(user_id: &str) -> Result<Option<String>> {
    let row = get_connection()
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT password_hash FROM sys_users WHERE id = ?",
            [user_id.into()],
        ))
        .await?;

    match row {
        Some(row) => Ok(Some(row.try_get("", "password_hash")?)),
        None => Ok(None),
    }
}

/// Newest first
pub async fn list_all() -> Result<Vec<SystemUser>> {
    let rows = get_connection()
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("SELECT {} FROM sys_users ORDER BY created_at DESC", USER_COLUMNS),
        ))
        .await?;

    rows.iter().map(row_to_user).collect()
}

/// Write every profile field (not the password)
pub async fn update(user: &SystemUser) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_users
             SET email = ?, full_name = ?, designation = ?, department_id = ?, institute_id = ?,
                 unit_id = ?, contact_number = ?, role = ?, is_active = ?, profile_picture = ?,
                 updated_at = ?
             WHERE id = ?",
            [
                user.email.clone().into(),
                user.full_name.clone().into(),
                user.designation.clone().into(),
                user.department_id.clone().into(),
                user.institute_id.clone().into(),
                user.unit_id.clone().into(),
                user.contact_number.clone().into(),
                user.role.as_str().into(),
                (if user.is_active { 1 } else { 0 }).into(),
                user.profile_picture.clone().into(),
                user.updated_at.clone().into(),
                user.uid.clone().into(),
            ],
        ))
        .await
        .context("Failed to update user")?;
    Ok(())
}

/// Hard delete
pub async fn delete(id: &str) -> Result<bool> {
    let result = get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM sys_users WHERE id = ?",
            [id.into()],
        ))
        .await
        .context("Failed to delete user")?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_last_login(id: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_users SET last_login_at = ? WHERE id = ?",
            [now.into(), id.into()],
        ))
        .await
        .context("Failed to update last login")?;
    Ok(())
}

pub async fn count_users() -> Result<u64> {
    let row = get_connection()
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT COUNT(*) as count FROM sys_users".to_string(),
        ))
        .await?;

    match row {
        Some(row) => Ok(row.try_get::<i64>("", "count")? as u64),
        None => Ok(0),
    }
}

pub async fn update_password(id: &str, password_hash: &str) -> Result<()> {
    get_connection()
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_users SET password_hash = ?, updated_at = ? WHERE id = ?",
            [
                password_hash.into(),
                chrono::Utc::now().to_rfc3339().into(),
                id.into(),
            ],
        ))
        .await
        .context("Failed to update password")?;
    Ok(())
}
