//! Field validation for the contact and user forms.
//!
//! Validators return an `ErrorMap` keyed by the form's field names. An empty
//! map means the record is valid. Whether errors block a submission is up to
//! the caller, see `ValidationPolicy`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::a004_contact::aggregate::ContactDto;
use crate::system::users::SystemUserDto;

/// Field name → human readable message
pub type ErrorMap = BTreeMap<String, String>;

pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// Optional +94 or 0 prefix followed by 9-10 digits
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\+94|0)?[0-9]{9,10}$").expect("phone pattern"));

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// Which flows refuse to submit a record that has errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    pub block_on_create: bool,
    pub block_on_update: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            block_on_create: true,
            block_on_update: true,
        }
    }
}

impl ValidationPolicy {
    pub fn blocks(&self, is_new: bool, errors: &ErrorMap) -> bool {
        if errors.is_empty() {
            return false;
        }
        if is_new {
            self.block_on_create
        } else {
            self.block_on_update
        }
    }
}

fn put(errors: &mut ErrorMap, field: &str, message: &str) {
    errors.insert(field.to_string(), message.to_string());
}

fn check_email(errors: &mut ErrorMap, field: &str, value: &str, required: bool, missing: &str) {
    let value = value.trim();
    if value.is_empty() {
        if required {
            put(errors, field, missing);
        }
    } else if !is_valid_email(value) {
        put(errors, field, "Please enter a valid email address");
    }
}

/// Validate a contact form.
///
/// Mobile number and the three category references are only required for
/// new records; existing records may predate those rules.
pub fn validate_contact(record: &ContactDto, is_new: bool) -> ErrorMap {
    let mut errors = ErrorMap::new();

    if record.full_name.trim().is_empty() {
        put(&mut errors, "fullName", "Full name is required");
    }

    check_email(
        &mut errors,
        "officialEmail",
        &record.official_email,
        true,
        "Official email is required",
    );
    check_email(&mut errors, "personalEmail", &record.personal_email, false, "");

    let mobile = record.mobile_no1.trim();
    if mobile.is_empty() {
        if is_new {
            put(&mut errors, "mobileNo1", "Mobile number is required");
        }
    } else if !is_valid_phone(mobile) {
        put(&mut errors, "mobileNo1", "Please enter a valid Sri Lankan phone number");
    }

    check_hierarchy(
        &mut errors,
        &record.department_id,
        &record.institute_id,
        &record.unit_id,
        is_new,
    );

    errors
}

/// Required-on-create category references, plus the rule that a level may
/// only be set when its parent is.
fn check_hierarchy(errors: &mut ErrorMap, department: &str, institute: &str, unit: &str, is_new: bool) {
    let (department, institute, unit) = (department.trim(), institute.trim(), unit.trim());

    if is_new {
        if department.is_empty() {
            put(errors, "departmentId", "Department is required");
        }
        if institute.is_empty() {
            put(errors, "instituteId", "Institute is required");
        }
        if unit.is_empty() {
            put(errors, "unitId", "Unit is required");
        }
    }

    if !institute.is_empty() && department.is_empty() && !errors.contains_key("departmentId") {
        put(errors, "instituteId", "Select a department before the institute");
    }
    if !unit.is_empty() && institute.is_empty() && !errors.contains_key("instituteId") {
        put(errors, "unitId", "Select an institute before the unit");
    }
}

/// Validate a system user form
pub fn validate_user(record: &SystemUserDto, is_new: bool) -> ErrorMap {
    let mut errors = ErrorMap::new();

    check_email(&mut errors, "email", &record.email, true, "Email is required");

    if record.full_name.trim().is_empty() {
        put(&mut errors, "fullName", "Full name is required");
    }

    let password = record.password.as_deref().unwrap_or("");
    if is_new && password.is_empty() {
        put(&mut errors, "password", "Password is required for new users");
    } else if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LENGTH {
        put(&mut errors, "password", "Password must be at least 6 characters");
    }

    let phone = record.contact_number.trim();
    if !phone.is_empty() && !is_valid_phone(phone) {
        put(&mut errors, "contactNumber", "Please enter a valid Sri Lankan phone number");
    }

    let institute_set = !record.institute_id.trim().is_empty();
    if institute_set && record.department_id.trim().is_empty() {
        put(&mut errors, "instituteId", "Select a department before the institute");
    }
    if !record.unit_id.trim().is_empty() && !institute_set {
        put(&mut errors, "unitId", "Select an institute before the unit");
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::users::UserRole;

    fn valid_contact() -> ContactDto {
        ContactDto {
            full_name: "Amal Perera".into(),
            official_email: "a@b.com".into(),
            mobile_no1: "0771234567".into(),
            department_id: "d1".into(),
            institute_id: "i1".into(),
            unit_id: "u1".into(),
            ..Default::default()
        }
    }

    fn keys(errors: &ErrorMap) -> Vec<&str> {
        errors.keys().map(String::as_str).collect()
    }

    #[test]
    fn test_valid_contact_has_no_errors() {
        assert!(validate_contact(&valid_contact(), true).is_empty());
    }

    #[test]
    fn test_blank_full_name_is_the_only_error() {
        let record = ContactDto {
            full_name: "".into(),
            ..valid_contact()
        };
        assert_eq!(keys(&validate_contact(&record, true)), vec!["fullName"]);
    }

    #[test]
    fn test_bad_official_email_regardless_of_name() {
        let record = ContactDto {
            full_name: "".into(),
            official_email: "not-an-email".into(),
            ..valid_contact()
        };
        let errors = validate_contact(&record, true);
        assert_eq!(
            errors.get("officialEmail").map(String::as_str),
            Some("Please enter a valid email address")
        );

        let record = ContactDto {
            official_email: "not-an-email".into(),
            ..valid_contact()
        };
        assert_eq!(keys(&validate_contact(&record, false)), vec!["officialEmail"]);
    }

    #[test]
    fn test_missing_official_email() {
        let record = ContactDto {
            official_email: "   ".into(),
            ..valid_contact()
        };
        assert_eq!(
            validate_contact(&record, false).get("officialEmail").map(String::as_str),
            Some("Official email is required")
        );
    }

    #[test]
    fn test_personal_email_only_checked_when_present() {
        let mut record = valid_contact();
        assert!(validate_contact(&record, true).is_empty());
        record.personal_email = "a@b".into();
        assert_eq!(keys(&validate_contact(&record, true)), vec!["personalEmail"]);
    }

    #[test]
    fn test_mobile_required_only_for_new_records() {
        let record = ContactDto {
            mobile_no1: "".into(),
            ..valid_contact()
        };
        assert_eq!(keys(&validate_contact(&record, true)), vec!["mobileNo1"]);
        assert!(validate_contact(&record, false).is_empty());
    }

    #[test]
    fn test_phone_pattern() {
        assert!(is_valid_phone("0771234567"));
        assert!(is_valid_phone("+94771234567"));
        assert!(is_valid_phone("771234567"));
        assert!(!is_valid_phone("07712"));
        assert!(!is_valid_phone("+1 555 1234"));
        assert!(!is_valid_phone("077123456789"));

        let record = ContactDto {
            mobile_no1: "12-34".into(),
            ..valid_contact()
        };
        assert_eq!(keys(&validate_contact(&record, false)), vec!["mobileNo1"]);
    }

    #[test]
    fn test_categories_required_only_for_new_records() {
        let record = ContactDto {
            department_id: "".into(),
            institute_id: "".into(),
            unit_id: "".into(),
            ..valid_contact()
        };
        assert_eq!(
            keys(&validate_contact(&record, true)),
            vec!["departmentId", "instituteId", "unitId"]
        );
        assert!(validate_contact(&record, false).is_empty());
    }

    #[test]
    fn test_unit_without_institute_is_rejected_on_edit() {
        let record = ContactDto {
            institute_id: "".into(),
            ..valid_contact()
        };
        assert_eq!(keys(&validate_contact(&record, false)), vec!["unitId"]);
    }

    #[test]
    fn test_policy() {
        let mut errors = ErrorMap::new();
        let lenient = ValidationPolicy {
            block_on_create: true,
            block_on_update: false,
        };
        assert!(!lenient.blocks(true, &errors));
        errors.insert("fullName".into(), "Full name is required".into());
        assert!(lenient.blocks(true, &errors));
        assert!(!lenient.blocks(false, &errors));
        assert!(ValidationPolicy::default().blocks(false, &errors));
    }

    fn valid_user() -> SystemUserDto {
        SystemUserDto {
            uid: None,
            email: "officer@agri.gov.lk".into(),
            password: Some("secret1".into()),
            full_name: "Nimal Silva".into(),
            designation: "".into(),
            department_id: "".into(),
            institute_id: "".into(),
            unit_id: "".into(),
            contact_number: "".into(),
            role: UserRole::Viewer,
            profile_picture: "".into(),
            is_active: true,
        }
    }

    #[test]
    fn test_valid_user() {
        assert!(validate_user(&valid_user(), true).is_empty());
    }

    #[test]
    fn test_user_password_rules() {
        let mut user = valid_user();
        user.password = None;
        assert_eq!(keys(&validate_user(&user, true)), vec!["password"]);
        assert!(validate_user(&user, false).is_empty());
        user.password = Some("abc".into());
        assert_eq!(keys(&validate_user(&user, false)), vec!["password"]);
    }

    #[test]
    fn test_user_email_and_phone() {
        let mut user = valid_user();
        user.email = "nope".into();
        user.contact_number = "12".into();
        assert_eq!(keys(&validate_user(&user, false)), vec!["contactNumber", "email"]);
    }
}
