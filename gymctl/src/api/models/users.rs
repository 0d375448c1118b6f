//! API request/response models for administrative users.

use crate::db::models::users::UserRecord;
use crate::errors::Error;
use crate::types::{FileId, UserId};
use crate::validate::ConstraintSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl UserCreate {
    pub fn validate(&self) -> Result<(), Error> {
        let mut set = ConstraintSet::new();
        set.min_len("name", &self.name, 1)
            .email("email", &self.email)
            .min_len("password", &self.password, 6);
        set.finish()
    }
}

/// Self-service profile update. Changing the password requires the old one
/// plus a matching confirmation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub old_password: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub avatar_id: Option<FileId>,
}

impl UserUpdate {
    pub fn validate(&self) -> Result<(), Error> {
        let mut set = ConstraintSet::new();
        if let Some(name) = &self.name {
            set.min_len("name", name, 1);
        }
        if let Some(email) = &self.email {
            set.email("email", email);
        }
        if let Some(password) = &self.password {
            set.min_len("password", password, 6);
            if self.old_password.is_none() {
                set.custom("old_password", "is required to change the password");
            }
            if self.confirm_password.as_deref() != Some(password.as_str()) {
                set.custom("confirm_password", "must match password");
            }
        }
        set.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[schema(value_type = Option<String>, format = "uuid")]
    pub avatar_id: Option<FileId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(db: UserRecord) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            avatar_id: db.avatar_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// The authenticated administrator, as carried in the session token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<UserRecord> for CurrentUser {
    fn from(db: UserRecord) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_change_requires_confirmation() {
        let update = UserUpdate {
            name: None,
            email: None,
            old_password: Some("old-secret".to_string()),
            password: Some("new-secret".to_string()),
            confirm_password: Some("different".to_string()),
            avatar_id: None,
        };
        assert!(update.validate().is_err());

        let update = UserUpdate {
            confirm_password: Some("new-secret".to_string()),
            ..update
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_password_change_requires_old_password() {
        let update = UserUpdate {
            name: None,
            email: None,
            old_password: None,
            password: Some("new-secret".to_string()),
            confirm_password: Some("new-secret".to_string()),
            avatar_id: None,
        };
        assert!(update.validate().is_err());
    }
}
