//! Common type definitions.
//!
//! All entity IDs are UUIDs wrapped in type aliases:
//!
//! - [`UserId`]: administrative user account identifier
//! - [`StudentId`]: gym student identifier
//! - [`PlanId`]: membership plan identifier
//! - [`EnrollmentId`]: enrollment record identifier
//! - [`CheckinId`]: check-in event identifier
//! - [`FileId`]: uploaded file identifier
//! - [`NotificationId`]: notification record identifier

use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type StudentId = Uuid;
pub type PlanId = Uuid;
pub type EnrollmentId = Uuid;
pub type CheckinId = Uuid;
pub type FileId = Uuid;
pub type NotificationId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbrev_uuid() {
        let id: Uuid = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert_eq!(abbrev_uuid(&id), "550e8400");
    }
}
