//! Collaborator contracts consumed by the membership core.
//!
//! The core never talks to PostgreSQL directly; it sees these traits.
//! Production wires [`crate::db::handlers::membership::PgMembershipStores`];
//! tests wire the in-memory doubles from [`crate::test_utils`]. Every method
//! returns the database error type so the adapters stay thin, and the
//! managers translate absences and violations into the service taxonomy.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::errors::Result;
use crate::db::models::{
    checkins::CheckinRecord,
    enrollments::{EnrollmentCreateDBRequest, EnrollmentRecord, EnrollmentUpdateDBRequest},
    plans::PlanRecord,
    students::StudentRecord,
};
use crate::types::{EnrollmentId, PlanId, StudentId};

/// Read-only lookup of plan price/duration by identifier.
#[async_trait]
pub trait PlanCatalog: Send + Sync {
    async fn plan_by_id(&self, id: PlanId) -> Result<Option<PlanRecord>>;
}

/// Read-only lookup of student records; the core references students but
/// never mutates them.
#[async_trait]
pub trait StudentDirectory: Send + Sync {
    async fn student_by_id(&self, id: StudentId) -> Result<Option<StudentRecord>>;
}

/// Persistence for enrollment records.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    async fn find_by_id(&self, id: EnrollmentId) -> Result<Option<EnrollmentRecord>>;

    /// The student's non-canceled enrollment, if any.
    async fn find_active_by_student(&self, student_id: StudentId) -> Result<Option<EnrollmentRecord>>;

    /// Every enrollment the student ever had, canceled ones included.
    async fn list_by_student(&self, student_id: StudentId) -> Result<Vec<EnrollmentRecord>>;

    async fn create(&self, request: &EnrollmentCreateDBRequest) -> Result<EnrollmentRecord>;

    async fn update(&self, id: EnrollmentId, request: &EnrollmentUpdateDBRequest) -> Result<EnrollmentRecord>;

    /// Soft-delete by setting `canceled_at`; fails with `NotFound` if the
    /// enrollment does not exist or is already canceled.
    async fn cancel(&self, id: EnrollmentId, at: DateTime<Utc>) -> Result<EnrollmentRecord>;
}

/// Persistence for check-in events.
#[async_trait]
pub trait CheckinStore: Send + Sync {
    async fn create(&self, student_id: StudentId, at: DateTime<Utc>) -> Result<CheckinRecord>;

    /// Check-ins with `created_at` in `[from, to)`.
    async fn find_by_student_in_range(&self, student_id: StudentId, from: DateTime<Utc>, to: DateTime<Utc>)
    -> Result<Vec<CheckinRecord>>;

    /// Full history, newest first.
    async fn list_by_student(&self, student_id: StudentId) -> Result<Vec<CheckinRecord>>;
}
