//! Database models for notification records.

use crate::types::{NotificationId, StudentId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A row in `notifications`.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationRecord {
    pub id: NotificationId,
    pub student_id: StudentId,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NotificationCreateDBRequest {
    pub student_id: StudentId,
    pub content: String,
}
