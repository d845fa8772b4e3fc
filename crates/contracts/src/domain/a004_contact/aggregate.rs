use serde::{Deserialize, Serialize};

use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::category_cache::CategorySnapshot;
use crate::shared::contact_list::DirectoryRecord;

crate::uuid_aggregate_id!(
    /// Contact identifier
    ContactId
);

// ============================================================================
// Classification enums
// ============================================================================

/// Employment status of a contact.
///
/// Older records use `OnDuty`/`Retired`/`Transferred`; they are read as
/// `Active`/`Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContactStatus {
    #[default]
    #[serde(alias = "OnDuty", alias = "active")]
    Active,
    #[serde(alias = "Retired", alias = "Transferred", alias = "inactive")]
    Inactive,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Active => "Active",
            ContactStatus::Inactive => "Inactive",
        }
    }

    pub fn all() -> Vec<ContactStatus> {
        vec![ContactStatus::Active, ContactStatus::Inactive]
    }

    /// Parse a stored or submitted value, mapping legacy vocabulary
    pub fn from_str_lenient(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "active" | "onduty" => Some(ContactStatus::Active),
            "inactive" | "retired" | "transferred" => Some(ContactStatus::Inactive),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of directory entry. `Person`/`Institute` are legacy spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContactType {
    #[default]
    #[serde(alias = "Person", alias = "staff")]
    Staff,
    #[serde(alias = "student")]
    Student,
    #[serde(alias = "Institute", alias = "external")]
    External,
}

impl ContactType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactType::Staff => "Staff",
            ContactType::Student => "Student",
            ContactType::External => "External",
        }
    }

    pub fn all() -> Vec<ContactType> {
        vec![ContactType::Staff, ContactType::Student, ContactType::External]
    }

    pub fn from_str_lenient(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "staff" | "person" => Some(ContactType::Staff),
            "student" => Some(ContactType::Student),
            "external" | "institute" => Some(ContactType::External),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Personnel or institute directory record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(flatten)]
    pub base: BaseAggregate<ContactId>,

    pub full_name: String,
    #[serde(default)]
    pub designation: String,

    // Organizational references (not enforced) and their display names
    #[serde(default)]
    pub department_id: String,
    #[serde(default)]
    pub institute_id: String,
    #[serde(default)]
    pub unit_id: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub institute: String,
    #[serde(default)]
    pub unit: String,

    pub official_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_email: Option<String>,
    /// Legacy records may lack it
    #[serde(default)]
    pub mobile_no1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_no2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub land_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    #[serde(default)]
    pub contact_type: ContactType,
    #[serde(default)]
    pub contact_status: ContactStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Display names of the organizational references of a contact
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryNames {
    pub department: String,
    pub institute: String,
    pub unit: String,
}

impl CategoryNames {
    /// Names of the referenced categories. Blank or dangling references
    /// resolve to an empty name.
    pub fn resolve(
        snapshot: &CategorySnapshot,
        department_id: &str,
        institute_id: &str,
        unit_id: &str,
    ) -> Self {
        let name = |found: Option<&str>| found.unwrap_or_default().to_string();
        Self {
            department: name(snapshot.department_name(department_id.trim())),
            institute: name(snapshot.institute_name(institute_id.trim())),
            unit: name(snapshot.unit_name(unit_id.trim())),
        }
    }
}

impl Contact {
    /// Create a new contact from a submitted form
    pub fn new_for_insert(dto: &ContactDto, names: CategoryNames) -> Self {
        let mut contact = Self {
            base: BaseAggregate::new(ContactId::new_v4()),
            full_name: String::new(),
            designation: String::new(),
            department_id: String::new(),
            institute_id: String::new(),
            unit_id: String::new(),
            department: String::new(),
            institute: String::new(),
            unit: String::new(),
            official_email: String::new(),
            personal_email: None,
            mobile_no1: String::new(),
            mobile_no2: None,
            land_line: None,
            extension: None,
            contact_type: ContactType::default(),
            contact_status: ContactStatus::default(),
            profile_picture: None,
        };
        contact.update(dto, names);
        contact
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Replace every form-editable field
    pub fn update(&mut self, dto: &ContactDto, names: CategoryNames) {
        self.full_name = dto.full_name.trim().to_string();
        self.designation = dto.designation.trim().to_string();
        self.department_id = dto.department_id.trim().to_string();
        self.institute_id = dto.institute_id.trim().to_string();
        self.unit_id = dto.unit_id.trim().to_string();
        self.department = names.department;
        self.institute = names.institute;
        self.unit = names.unit;
        self.official_email = dto.official_email.trim().to_string();
        self.personal_email = non_blank(&dto.personal_email);
        self.mobile_no1 = dto.mobile_no1.trim().to_string();
        self.mobile_no2 = non_blank(&dto.mobile_no2);
        self.land_line = non_blank(&dto.land_line);
        self.extension = non_blank(&dto.extension);
        self.contact_type = dto.contact_type;
        self.contact_status = dto.contact_status;
        self.profile_picture = non_blank(&dto.profile_picture);
    }

    /// Merge a partial update. Fields absent from the patch keep their value,
    /// except references below a changed parent, which are cleared unless
    /// the patch sets them. Returns true when an organizational reference
    /// changed, so the caller can refresh the display names.
    pub fn apply_patch(&mut self, patch: &ContactPatch) -> bool {
        fn set(target: &mut String, value: &Option<String>) {
            if let Some(v) = value {
                *target = v.trim().to_string();
            }
        }
        fn set_opt(target: &mut Option<String>, value: &Option<String>) {
            if let Some(v) = value {
                *target = non_blank(v);
            }
        }

        let refs_before = (
            self.department_id.clone(),
            self.institute_id.clone(),
            self.unit_id.clone(),
        );

        set(&mut self.full_name, &patch.full_name);
        set(&mut self.designation, &patch.designation);
        set(&mut self.department_id, &patch.department_id);
        set(&mut self.institute_id, &patch.institute_id);
        set(&mut self.unit_id, &patch.unit_id);
        // A moved parent drops the children the patch did not resend
        if self.department_id != refs_before.0 && patch.institute_id.is_none() {
            self.institute_id.clear();
            self.unit_id.clear();
        } else if self.institute_id != refs_before.1 && patch.unit_id.is_none() {
            self.unit_id.clear();
        }
        set(&mut self.official_email, &patch.official_email);
        set_opt(&mut self.personal_email, &patch.personal_email);
        set(&mut self.mobile_no1, &patch.mobile_no1);
        set_opt(&mut self.mobile_no2, &patch.mobile_no2);
        set_opt(&mut self.land_line, &patch.land_line);
        set_opt(&mut self.extension, &patch.extension);
        set_opt(&mut self.profile_picture, &patch.profile_picture);
        if let Some(t) = patch.contact_type {
            self.contact_type = t;
        }
        if let Some(s) = patch.contact_status {
            self.contact_status = s;
        }

        refs_before
            != (
                self.department_id.clone(),
                self.institute_id.clone(),
                self.unit_id.clone(),
            )
    }

    pub fn set_category_names(&mut self, names: CategoryNames) {
        self.department = names.department;
        self.institute = names.institute;
        self.unit = names.unit;
    }

    /// Form view of the stored record, used to re-validate merged edits
    pub fn to_dto(&self) -> ContactDto {
        ContactDto {
            id: Some(self.to_string_id()),
            full_name: self.full_name.clone(),
            designation: self.designation.clone(),
            department_id: self.department_id.clone(),
            institute_id: self.institute_id.clone(),
            unit_id: self.unit_id.clone(),
            official_email: self.official_email.clone(),
            personal_email: self.personal_email.clone().unwrap_or_default(),
            mobile_no1: self.mobile_no1.clone(),
            mobile_no2: self.mobile_no2.clone().unwrap_or_default(),
            land_line: self.land_line.clone().unwrap_or_default(),
            extension: self.extension.clone().unwrap_or_default(),
            contact_type: self.contact_type,
            contact_status: self.contact_status,
            profile_picture: self.profile_picture.clone().unwrap_or_default(),
        }
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl AggregateRoot for Contact {
    type Id = ContactId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a004"
    }

    fn collection_name() -> &'static str {
        "contact"
    }

    fn element_name() -> &'static str {
        "Contact"
    }

    fn list_name() -> &'static str {
        "Contacts"
    }
}

impl DirectoryRecord for Contact {
    fn search_fields(&self) -> [&str; 4] {
        [
            self.full_name.as_str(),
            self.department.as_str(),
            self.designation.as_str(),
            self.official_email.as_str(),
        ]
    }

    fn phone(&self) -> &str {
        &self.mobile_no1
    }

    fn status(&self) -> &str {
        self.contact_status.as_str()
    }

    fn kind(&self) -> &str {
        self.contact_type.as_str()
    }

    fn field_text(&self, field: &str) -> Option<String> {
        let value = match field {
            "fullName" | "full_name" => self.full_name.clone(),
            "designation" => self.designation.clone(),
            "department" => self.department.clone(),
            "institute" => self.institute.clone(),
            "unit" => self.unit.clone(),
            "officialEmail" | "official_email" => self.official_email.clone(),
            "personalEmail" | "personal_email" => self.personal_email.clone()?,
            "mobileNo1" | "mobile_no1" => self.mobile_no1.clone(),
            "contactType" | "contact_type" => self.contact_type.as_str().to_string(),
            "contactStatus" | "contact_status" => self.contact_status.as_str().to_string(),
            "createdAt" | "created_at" => self.base.metadata.created_at.to_rfc3339(),
            "updatedAt" | "updated_at" => self.base.metadata.updated_at.to_rfc3339(),
            _ => return None,
        };
        Some(value)
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Contact form record. Empty strings stand for absent optional values.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactDto {
    pub id: Option<String>,
    pub full_name: String,
    pub designation: String,
    pub department_id: String,
    pub institute_id: String,
    pub unit_id: String,
    pub official_email: String,
    pub personal_email: String,
    pub mobile_no1: String,
    pub mobile_no2: String,
    pub land_line: String,
    pub extension: String,
    pub contact_type: ContactType,
    pub contact_status: ContactStatus,
    pub profile_picture: String,
}

/// Partial update: only present fields are written
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactPatch {
    pub full_name: Option<String>,
    pub designation: Option<String>,
    pub department_id: Option<String>,
    pub institute_id: Option<String>,
    pub unit_id: Option<String>,
    pub official_email: Option<String>,
    pub personal_email: Option<String>,
    pub mobile_no1: Option<String>,
    pub mobile_no2: Option<String>,
    pub land_line: Option<String>,
    pub extension: Option<String>,
    pub contact_type: Option<ContactType>,
    pub contact_status: Option<ContactStatus>,
    pub profile_picture: Option<String>,
}

impl From<&ContactDto> for ContactPatch {
    /// Patch that writes every form field
    fn from(dto: &ContactDto) -> Self {
        Self {
            full_name: Some(dto.full_name.clone()),
            designation: Some(dto.designation.clone()),
            department_id: Some(dto.department_id.clone()),
            institute_id: Some(dto.institute_id.clone()),
            unit_id: Some(dto.unit_id.clone()),
            official_email: Some(dto.official_email.clone()),
            personal_email: Some(dto.personal_email.clone()),
            mobile_no1: Some(dto.mobile_no1.clone()),
            mobile_no2: Some(dto.mobile_no2.clone()),
            land_line: Some(dto.land_line.clone()),
            extension: Some(dto.extension.clone()),
            contact_type: Some(dto.contact_type),
            contact_status: Some(dto.contact_status),
            profile_picture: Some(dto.profile_picture.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dto() -> ContactDto {
        ContactDto {
            full_name: " Amal Perera ".into(),
            designation: "Research Officer".into(),
            department_id: "d1".into(),
            institute_id: "i1".into(),
            unit_id: "u1".into(),
            official_email: "amal@agri.gov.lk".into(),
            mobile_no1: "0771234567".into(),
            ..Default::default()
        }
    }

    fn names() -> CategoryNames {
        CategoryNames {
            department: "Agriculture".into(),
            institute: "Rice Research".into(),
            unit: "Breeding".into(),
        }
    }

    #[test]
    fn test_new_for_insert_trims_and_denormalizes() {
        let contact = Contact::new_for_insert(&sample_dto(), names());
        assert_eq!(contact.full_name, "Amal Perera");
        assert_eq!(contact.department, "Agriculture");
        assert_eq!(contact.personal_email, None);
        assert_eq!(contact.contact_status, ContactStatus::Active);
    }

    #[test]
    fn test_legacy_status_and_type_are_migrated_on_read() {
        let json = serde_json::json!({
            "id": uuid::Uuid::new_v4().to_string(),
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "fullName": "John Doe",
            "officialEmail": "john.doe@agriculture.gov",
            "contactType": "Person",
            "contactStatus": "OnDuty"
        });
        let contact: Contact = serde_json::from_value(json).unwrap();
        assert_eq!(contact.contact_status, ContactStatus::Active);
        assert_eq!(contact.contact_type, ContactType::Staff);
        assert_eq!(contact.mobile_no1, "");
    }

    #[test]
    fn test_lenient_parsing() {
        assert_eq!(ContactStatus::from_str_lenient("Retired"), Some(ContactStatus::Inactive));
        assert_eq!(ContactStatus::from_str_lenient("transferred"), Some(ContactStatus::Inactive));
        assert_eq!(ContactType::from_str_lenient("Institute"), Some(ContactType::External));
        assert_eq!(ContactType::from_str_lenient("alien"), None);
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut contact = Contact::new_for_insert(&sample_dto(), names());
        let refs_changed = contact.apply_patch(&ContactPatch {
            designation: Some("Director".into()),
            personal_email: Some("".into()),
            contact_status: Some(ContactStatus::Inactive),
            ..Default::default()
        });
        assert!(!refs_changed);
        assert_eq!(contact.designation, "Director");
        assert_eq!(contact.full_name, "Amal Perera");
        assert_eq!(contact.contact_status, ContactStatus::Inactive);
        assert_eq!(contact.personal_email, None);
    }

    #[test]
    fn test_patch_reports_reference_change() {
        let mut contact = Contact::new_for_insert(&sample_dto(), names());
        assert!(contact.apply_patch(&ContactPatch {
            unit_id: Some("u2".into()),
            ..Default::default()
        }));
    }

    #[test]
    fn test_patch_department_only_clears_institute_and_unit() {
        let mut contact = Contact::new_for_insert(&sample_dto(), names());
        assert!(contact.apply_patch(&ContactPatch {
            department_id: Some("d2".into()),
            ..Default::default()
        }));
        assert_eq!(contact.department_id, "d2");
        assert_eq!(contact.institute_id, "");
        assert_eq!(contact.unit_id, "");
    }

    #[test]
    fn test_patch_institute_only_clears_unit() {
        let mut contact = Contact::new_for_insert(&sample_dto(), names());
        contact.apply_patch(&ContactPatch {
            institute_id: Some("i2".into()),
            ..Default::default()
        });
        assert_eq!(contact.department_id, "d1");
        assert_eq!(contact.institute_id, "i2");
        assert_eq!(contact.unit_id, "");
    }

    #[test]
    fn test_patch_resending_children_keeps_them() {
        let mut contact = Contact::new_for_insert(&sample_dto(), names());
        contact.apply_patch(&ContactPatch {
            department_id: Some("d2".into()),
            institute_id: Some("i7".into()),
            unit_id: Some("u7".into()),
            ..Default::default()
        });
        assert_eq!(
            (contact.department_id.as_str(), contact.institute_id.as_str(), contact.unit_id.as_str()),
            ("d2", "i7", "u7")
        );

        // Same department resent: children untouched
        contact.apply_patch(&ContactPatch {
            department_id: Some("d2".into()),
            ..Default::default()
        });
        assert_eq!(contact.unit_id, "u7");
    }

    #[test]
    fn test_names_resolve_from_snapshot() {
        let snapshot = crate::shared::category_cache::tests::sample_snapshot();
        let names = CategoryNames::resolve(&snapshot, "d2", "i3", "gone");
        assert_eq!(names.department, "Irrigation");
        assert_eq!(names.institute, "Water Management");
        assert_eq!(names.unit, "");
        assert_eq!(CategoryNames::resolve(&snapshot, "", "", ""), CategoryNames::default());
    }

    #[test]
    fn test_field_text_covers_sort_fields() {
        let contact = Contact::new_for_insert(&sample_dto(), names());
        assert_eq!(contact.field_text("fullName").as_deref(), Some("Amal Perera"));
        assert_eq!(contact.field_text("department").as_deref(), Some("Agriculture"));
        assert_eq!(contact.field_text("personalEmail"), None);
        assert_eq!(contact.field_text("nope"), None);
    }

    #[test]
    fn test_dto_round_trip_keeps_form_fields() {
        let contact = Contact::new_for_insert(&sample_dto(), names());
        let dto = contact.to_dto();
        assert_eq!(dto.full_name, "Amal Perera");
        assert_eq!(dto.unit_id, "u1");
        assert_eq!(dto.id, Some(contact.to_string_id()));
    }

    #[test]
    fn test_full_patch_reproduces_the_form() {
        let mut contact = Contact::new_for_insert(&sample_dto(), names());
        let mut edited = contact.to_dto();
        edited.designation = "Director".into();
        edited.land_line = "0112345678".into();
        contact.apply_patch(&ContactPatch::from(&edited));
        assert_eq!(contact.designation, "Director");
        assert_eq!(contact.land_line.as_deref(), Some("0112345678"));
        assert_eq!(contact.to_dto().full_name, "Amal Perera");
    }
}
