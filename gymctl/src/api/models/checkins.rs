//! API request/response models for check-ins.

use crate::db::models::checkins::CheckinRecord;
use crate::types::{CheckinId, StudentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The identity the student claims when checking in. An explicit named
/// field; it must match the student addressed by the path.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckinRequest {
    #[schema(value_type = String, format = "uuid")]
    pub student_id: StudentId,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckinResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CheckinId,
    #[schema(value_type = String, format = "uuid")]
    pub student_id: StudentId,
    pub created_at: DateTime<Utc>,
}

impl From<CheckinRecord> for CheckinResponse {
    fn from(db: CheckinRecord) -> Self {
        Self {
            id: db.id,
            student_id: db.student_id,
            created_at: db.created_at,
        }
    }
}
