//! Database models for enrollments.

use crate::types::{EnrollmentId, PlanId, StudentId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A row in `enrollments`.
///
/// `end_date` and `price` are derived from the plan at creation/update time
/// and never supplied by callers. `canceled_at` set means the membership was
/// soft-deleted; such rows are kept for history but no longer count as the
/// student's active enrollment.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentRecord {
    pub id: EnrollmentId,
    pub student_id: StudentId,
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
    pub canceled_at: Option<DateTime<Utc>>,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EnrollmentRecord {
    /// Whether the membership window covers the given day.
    pub fn window_contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

#[derive(Debug, Clone)]
pub struct EnrollmentCreateDBRequest {
    pub student_id: StudentId,
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
    pub created_by: UserId,
}

/// Rewrites the plan reference, the window and the derived price together.
/// The owning student is immutable and therefore absent here.
#[derive(Debug, Clone)]
pub struct EnrollmentUpdateDBRequest {
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: Decimal,
}
