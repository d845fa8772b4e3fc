use serde::{Deserialize, Serialize};

/// Access level of a console account.
///
/// `User` is the legacy spelling of `Viewer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UserRole {
    Admin,
    DataEntry,
    #[default]
    #[serde(alias = "User")]
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "Admin",
            UserRole::DataEntry => "DataEntry",
            UserRole::Viewer => "Viewer",
        }
    }

    pub fn all() -> Vec<UserRole> {
        vec![UserRole::Admin, UserRole::DataEntry, UserRole::Viewer]
    }

    /// Unknown values fall back to `Viewer`
    pub fn from_str_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "admin" => UserRole::Admin,
            "dataentry" | "data_entry" | "data entry" => UserRole::DataEntry,
            _ => UserRole::Viewer,
        }
    }

    /// Create, edit and delete contacts and categories
    pub fn can_edit_directory(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::DataEntry)
    }

    pub fn can_manage_users(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemUser {
    pub uid: String,
    pub email: String,
    pub full_name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub department_id: String,
    #[serde(default)]
    pub institute_id: String,
    #[serde(default)]
    pub unit_id: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub role: UserRole,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub last_login_at: Option<String>,
}

/// User form. `password` is required on create and optional on update.
/// `profile_picture` may carry a `data:` URL, which the server stores and
/// replaces with a public URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemUserDto {
    pub uid: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub full_name: String,
    pub designation: String,
    pub department_id: String,
    pub institute_id: String,
    pub unit_id: String,
    pub contact_number: String,
    pub role: UserRole,
    pub profile_picture: String,
    pub is_active: bool,
}

impl Default for SystemUserDto {
    fn default() -> Self {
        Self {
            uid: None,
            email: String::new(),
            password: None,
            full_name: String::new(),
            designation: String::new(),
            department_id: String::new(),
            institute_id: String::new(),
            unit_id: String::new(),
            contact_number: String::new(),
            role: UserRole::Viewer,
            profile_picture: String::new(),
            is_active: true,
        }
    }
}

impl From<&SystemUser> for SystemUserDto {
    fn from(user: &SystemUser) -> Self {
        Self {
            uid: Some(user.uid.clone()),
            email: user.email.clone(),
            password: None,
            full_name: user.full_name.clone(),
            designation: user.designation.clone(),
            department_id: user.department_id.clone(),
            institute_id: user.institute_id.clone(),
            unit_id: user.unit_id.clone(),
            contact_number: user.contact_number.clone(),
            role: user.role,
            profile_picture: user.profile_picture.clone().unwrap_or_default(),
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    pub old_password: Option<String>, // None when an admin resets someone else's password
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_user_role_reads_as_viewer() {
        let role: UserRole = serde_json::from_str("\"User\"").unwrap();
        assert_eq!(role, UserRole::Viewer);
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"Viewer\"");
    }

    #[test]
    fn test_permissions() {
        assert!(UserRole::Admin.can_manage_users());
        assert!(UserRole::DataEntry.can_edit_directory());
        assert!(!UserRole::DataEntry.can_manage_users());
        assert!(!UserRole::Viewer.can_edit_directory());
        assert_eq!(UserRole::from_str_lenient("data_entry"), UserRole::DataEntry);
        assert_eq!(UserRole::from_str_lenient("???"), UserRole::Viewer);
    }

    #[test]
    fn test_dto_defaults_for_new_user() {
        let dto: SystemUserDto =
            serde_json::from_str(r#"{"email":"a@b.com","fullName":"A","password":"secret1"}"#).unwrap();
        assert!(dto.is_active);
        assert_eq!(dto.role, UserRole::Viewer);
        assert_eq!(dto.uid, None);
    }
}
