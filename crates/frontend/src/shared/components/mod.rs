pub mod field_error;
pub mod modal;
pub mod pagination_controls;
