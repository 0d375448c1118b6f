//! API request/response models for enrollments.

use crate::db::models::enrollments::EnrollmentRecord;
use crate::types::{EnrollmentId, PlanId, StudentId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Caller-supplied enrollment fields. `end_date` and `price` are derived
/// server-side and cannot be submitted.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EnrollmentCreate {
    #[schema(value_type = String, format = "uuid")]
    pub student_id: StudentId,
    #[schema(value_type = String, format = "uuid")]
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EnrollmentUpdate {
    #[schema(value_type = String, format = "uuid")]
    pub student_id: StudentId,
    #[schema(value_type = String, format = "uuid")]
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: EnrollmentId,
    #[schema(value_type = String, format = "uuid")]
    pub student_id: StudentId,
    #[schema(value_type = String, format = "uuid")]
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub canceled_at: Option<DateTime<Utc>>,
    #[schema(value_type = String, format = "uuid")]
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EnrollmentRecord> for EnrollmentResponse {
    fn from(db: EnrollmentRecord) -> Self {
        Self {
            id: db.id,
            student_id: db.student_id,
            plan_id: db.plan_id,
            start_date: db.start_date,
            end_date: db.end_date,
            price: db.price,
            canceled_at: db.canceled_at,
            created_by: db.created_by,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
