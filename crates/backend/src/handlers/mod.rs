pub mod a001_department;
pub mod a002_institute;
pub mod a003_unit;
pub mod a004_contact;
pub mod categories;
pub mod d400_directory_summary;
pub mod uploads;

use axum::http::StatusCode;
use uuid::Uuid;

/// Path id as a UUID, 400 otherwise
pub(crate) fn parse_uuid(id: &str) -> Result<Uuid, StatusCode> {
    Uuid::parse_str(id).map_err(|_| StatusCode::BAD_REQUEST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_uuid(&id.to_string()), Ok(id));
        assert_eq!(parse_uuid("42"), Err(StatusCode::BAD_REQUEST));
    }
}
