//! Database models for check-in events.

use crate::types::{CheckinId, StudentId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A row in `checkins`. Immutable once written; read back only for quota
/// accounting and history listings.
#[derive(Debug, Clone, FromRow)]
pub struct CheckinRecord {
    pub id: CheckinId,
    pub student_id: StudentId,
    pub created_at: DateTime<Utc>,
}
