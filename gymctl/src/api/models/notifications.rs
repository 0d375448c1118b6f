//! API response models for the notification feed.

use crate::db::models::notifications::NotificationRecord;
use crate::types::{NotificationId, StudentId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NotificationResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: NotificationId,
    #[schema(value_type = String, format = "uuid")]
    pub student_id: StudentId,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRecord> for NotificationResponse {
    fn from(db: NotificationRecord) -> Self {
        Self {
            id: db.id,
            student_id: db.student_id,
            content: db.content,
            read: db.read,
            created_at: db.created_at,
        }
    }
}
