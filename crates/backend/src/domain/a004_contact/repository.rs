use chrono::Utc;
use contracts::domain::a004_contact::aggregate::{Contact, ContactId, ContactStatus, ContactType};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_contact")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub full_name: String,
    pub designation: String,
    pub department_id: String,
    pub institute_id: String,
    pub unit_id: String,
    pub department: String,
    pub institute: String,
    pub unit: String,
    pub official_email: String,
    pub personal_email: Option<String>,
    pub mobile_no1: String,
    pub mobile_no2: Option<String>,
    pub land_line: Option<String>,
    pub extension: Option<String>,
    pub contact_type: String,
    pub contact_status: String,
    pub profile_picture: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Contact {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        // Older rows carry OnDuty/Retired/Person style values
        let contact_type = ContactType::from_str_lenient(&m.contact_type).unwrap_or_default();
        let contact_status = ContactStatus::from_str_lenient(&m.contact_status).unwrap_or_default();

        Contact {
            base: BaseAggregate::with_metadata(ContactId(uuid), metadata),
            full_name: m.full_name,
            designation: m.designation,
            department_id: m.department_id,
            institute_id: m.institute_id,
            unit_id: m.unit_id,
            department: m.department,
            institute: m.institute,
            unit: m.unit,
            official_email: m.official_email,
            personal_email: m.personal_email,
            mobile_no1: m.mobile_no1,
            mobile_no2: m.mobile_no2,
            land_line: m.land_line,
            extension: m.extension,
            contact_type,
            contact_status,
            profile_picture: m.profile_picture,
        }
    }
}

fn to_active(aggregate: &Contact) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        full_name: Set(aggregate.full_name.clone()),
        designation: Set(aggregate.designation.clone()),
        department_id: Set(aggregate.department_id.clone()),
        institute_id: Set(aggregate.institute_id.clone()),
        unit_id: Set(aggregate.unit_id.clone()),
        department: Set(aggregate.department.clone()),
        institute: Set(aggregate.institute.clone()),
        unit: Set(aggregate.unit.clone()),
        official_email: Set(aggregate.official_email.clone()),
        personal_email: Set(aggregate.personal_email.clone()),
        mobile_no1: Set(aggregate.mobile_no1.clone()),
        mobile_no2: Set(aggregate.mobile_no2.clone()),
        land_line: Set(aggregate.land_line.clone()),
        extension: Set(aggregate.extension.clone()),
        contact_type: Set(aggregate.contact_type.as_str().to_string()),
        contact_status: Set(aggregate.contact_status.as_str().to_string()),
        profile_picture: Set(aggregate.profile_picture.clone()),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn into_contacts(models: Vec<Model>) -> Vec<Contact> {
    models.into_iter().map(Into::into).collect()
}

/// Whole collection ordered by name
pub async fn list_all() -> anyhow::Result<Vec<Contact>> {
    let models = Entity::find()
        .order_by_asc(Column::FullName)
        .all(conn())
        .await?;
    Ok(into_contacts(models))
}

pub async fn list_by_department(department_id: &str) -> anyhow::Result<Vec<Contact>> {
    let models = Entity::find()
        .filter(Column::DepartmentId.eq(department_id))
        .order_by_asc(Column::FullName)
        .all(conn())
        .await?;
    Ok(into_contacts(models))
}

pub async fn list_by_institute(institute_id: &str) -> anyhow::Result<Vec<Contact>> {
    let models = Entity::find()
        .filter(Column::InstituteId.eq(institute_id))
        .order_by_asc(Column::FullName)
        .all(conn())
        .await?;
    Ok(into_contacts(models))
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Contact>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Contact) -> anyhow::Result<Uuid> {
    to_active(aggregate).insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

/// Replace the stored row; `created_at` is never rewritten
pub async fn update(aggregate: &Contact) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id.to_string()).exec(conn()).await?;
    Ok(result.rows_affected > 0)
}

pub async fn count() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}
