//! Shared SQLite file for tests that go through the repositories.
//!
//! The connection is process-wide, so every test opens the same temporary
//! database and creates its own uniquely named rows.

use chrono::Utc;
use contracts::system::users::{SystemUser, UserRole};
use tokio::sync::OnceCell;

use crate::shared::data::db;
use crate::system::auth::jwt;
use crate::system::users::repository;

static DATABASE: OnceCell<tempfile::TempDir> = OnceCell::const_new();

pub async fn database() {
    DATABASE
        .get_or_init(|| async {
            let dir = tempfile::tempdir().unwrap();
            db::initialize_database(&dir.path().join("directory.db"))
                .await
                .unwrap();
            dir
        })
        .await;
}

/// Insert an account with a unique email
pub async fn user(role: UserRole, is_active: bool) -> SystemUser {
    let uid = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    let user = SystemUser {
        email: format!("{}@agri.test", &uid[..8]),
        uid,
        full_name: format!("{} account", role),
        designation: String::new(),
        department_id: String::new(),
        institute_id: String::new(),
        unit_id: String::new(),
        contact_number: String::new(),
        role,
        is_active,
        profile_picture: None,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
    };
    repository::create_with_password(&user, "not-a-real-hash")
        .await
        .unwrap();
    user
}

/// Access token as issued at login
pub async fn token_for(user: &SystemUser) -> String {
    jwt::generate_access_token(&user.uid, &user.email, user.role)
        .await
        .unwrap()
}

/// Department, institute and unit ids of a fresh branch of the hierarchy
pub async fn hierarchy(label: &str) -> (String, String, String) {
    use crate::domain::{a001_department, a002_institute, a003_unit};
    use contracts::domain::a001_department::aggregate::DepartmentDto;
    use contracts::domain::a002_institute::aggregate::InstituteDto;
    use contracts::domain::a003_unit::aggregate::UnitDto;

    let suffix = &uuid::Uuid::new_v4().to_string()[..8];
    let department_id = a001_department::service::create(DepartmentDto {
        id: None,
        name: format!("{} department {}", label, suffix),
        description: None,
    })
    .await
    .unwrap()
    .to_string();
    let institute_id = a002_institute::service::create(InstituteDto {
        id: None,
        name: format!("{} institute {}", label, suffix),
        description: None,
        department_id: department_id.clone(),
    })
    .await
    .unwrap()
    .to_string();
    let unit_id = a003_unit::service::create(UnitDto {
        id: None,
        name: format!("{} unit {}", label, suffix),
        description: None,
        institute_id: institute_id.clone(),
    })
    .await
    .unwrap()
    .to_string();
    (department_id, institute_id, unit_id)
}
