pub mod a001_department;
pub mod a002_institute;
pub mod a003_unit;
pub mod a004_contact;
pub mod categories;
