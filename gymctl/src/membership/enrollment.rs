//! Enrollment lifecycle management.
//!
//! Creation and update derive the membership window and total price from the
//! referenced plan; callers never supply `end_date` or `price`. All writes
//! for one student run under that student's lock so the "at most one active
//! enrollment" invariant holds even under concurrent requests.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::instrument;

use crate::clock::Clock;
use crate::db::errors::DbError;
use crate::db::models::{
    enrollments::{EnrollmentCreateDBRequest, EnrollmentRecord, EnrollmentUpdateDBRequest},
    plans::PlanRecord,
};
use crate::errors::{Error, Result};
use crate::membership::{StudentLocks, add_months};
use crate::membership::stores::{EnrollmentStore, PlanCatalog, StudentDirectory};
use crate::notifications::{EnrollmentEvent, EnrollmentEventKind, NotificationDispatcher};
use crate::types::{EnrollmentId, PlanId, StudentId, UserId, abbrev_uuid};

/// Caller-supplied fields for a new enrollment; everything else is derived.
#[derive(Debug, Clone)]
pub struct NewEnrollment {
    pub student_id: StudentId,
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
    pub created_by: UserId,
}

/// Caller-supplied fields for an enrollment rewrite. `student_id` is carried
/// only so ownership reassignment attempts can be rejected.
#[derive(Debug, Clone)]
pub struct EnrollmentChange {
    pub student_id: StudentId,
    pub plan_id: PlanId,
    pub start_date: NaiveDate,
}

pub struct EnrollmentLifecycleManager {
    students: Arc<dyn StudentDirectory>,
    plans: Arc<dyn PlanCatalog>,
    enrollments: Arc<dyn EnrollmentStore>,
    clock: Arc<dyn Clock>,
    locks: Arc<StudentLocks>,
    dispatcher: NotificationDispatcher,
}

impl EnrollmentLifecycleManager {
    pub fn new(
        students: Arc<dyn StudentDirectory>,
        plans: Arc<dyn PlanCatalog>,
        enrollments: Arc<dyn EnrollmentStore>,
        clock: Arc<dyn Clock>,
        locks: Arc<StudentLocks>,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            students,
            plans,
            enrollments,
            clock,
            locks,
            dispatcher,
        }
    }

    /// Enroll a student in a plan starting on `start_date`.
    ///
    /// Rejects, each as a distinct error: unknown student, unknown plan, an
    /// existing active enrollment, and a start date strictly before the
    /// current day (same-day starts are permitted).
    #[instrument(skip(self, request), fields(student_id = %abbrev_uuid(&request.student_id)), err)]
    pub async fn create(&self, request: NewEnrollment) -> Result<EnrollmentRecord> {
        let _guard = self.locks.acquire(request.student_id).await;

        let student = self
            .students
            .student_by_id(request.student_id)
            .await?
            .ok_or(Error::NotFound { resource: "Student" })?;

        let plan = self
            .plans
            .plan_by_id(request.plan_id)
            .await?
            .ok_or(Error::NotFound { resource: "Plan" })?;

        if self.enrollments.find_active_by_student(request.student_id).await?.is_some() {
            return Err(Error::Conflict {
                message: "The student is already enrolled".to_string(),
            });
        }

        self.reject_past_start(request.start_date)?;

        let (end_date, price) = derive_terms(&plan, request.start_date)?;

        let record = self
            .enrollments
            .create(&EnrollmentCreateDBRequest {
                student_id: request.student_id,
                plan_id: request.plan_id,
                start_date: request.start_date,
                end_date,
                price,
                created_by: request.created_by,
            })
            .await?;

        self.dispatcher
            .notify(EnrollmentEvent::new(EnrollmentEventKind::Created, &student, &plan, &record));

        Ok(record)
    }

    /// Rewrite an enrollment's plan and start date, re-deriving the window
    /// and price exactly as `create` does. The owning student is immutable:
    /// a change carrying a different `student_id` is rejected.
    #[instrument(skip(self, change), fields(enrollment_id = %abbrev_uuid(&id)), err)]
    pub async fn update(&self, id: EnrollmentId, change: EnrollmentChange) -> Result<EnrollmentRecord> {
        let current = self
            .enrollments
            .find_by_id(id)
            .await?
            .ok_or(Error::NotFound { resource: "Enrollment" })?;

        let _guard = self.locks.acquire(current.student_id).await;

        // Re-read under the lock; the record may have changed while we waited.
        let current = self
            .enrollments
            .find_by_id(id)
            .await?
            .ok_or(Error::NotFound { resource: "Enrollment" })?;

        if change.student_id != current.student_id {
            return Err(Error::OwnershipViolation);
        }

        let student = self
            .students
            .student_by_id(current.student_id)
            .await?
            .ok_or(Error::NotFound { resource: "Student" })?;

        let plan = self
            .plans
            .plan_by_id(change.plan_id)
            .await?
            .ok_or(Error::NotFound { resource: "Plan" })?;

        self.reject_past_start(change.start_date)?;

        let (end_date, price) = derive_terms(&plan, change.start_date)?;

        let record = self
            .enrollments
            .update(
                id,
                &EnrollmentUpdateDBRequest {
                    plan_id: change.plan_id,
                    start_date: change.start_date,
                    end_date,
                    price,
                },
            )
            .await?;

        self.dispatcher
            .notify(EnrollmentEvent::new(EnrollmentEventKind::Updated, &student, &plan, &record));

        Ok(record)
    }

    /// Cancel an enrollment (soft delete), freeing the student to enroll
    /// again. Canceling twice reports the enrollment as absent: `canceled_at`
    /// is immutable once set.
    #[instrument(skip(self), fields(enrollment_id = %abbrev_uuid(&id)), err)]
    pub async fn cancel(&self, id: EnrollmentId) -> Result<EnrollmentRecord> {
        let current = self
            .enrollments
            .find_by_id(id)
            .await?
            .ok_or(Error::NotFound { resource: "Enrollment" })?;

        let _guard = self.locks.acquire(current.student_id).await;

        match self.enrollments.cancel(id, self.clock.now()).await {
            Ok(record) => Ok(record),
            Err(DbError::NotFound) => Err(Error::NotFound { resource: "Enrollment" }),
            Err(other) => Err(other.into()),
        }
    }

    /// Start dates are day-granular; anything before the current day is
    /// rejected, today itself is allowed.
    fn reject_past_start(&self, start_date: NaiveDate) -> Result<()> {
        let today = self.clock.now().date_naive();
        if start_date < today {
            return Err(Error::InvalidDate {
                message: format!("Dates prior to {} are not allowed", today.format("%B %d")),
            });
        }
        Ok(())
    }
}

/// Derive the membership window end and total price from the plan:
/// `end_date = start + duration months` (calendar months), `price =
/// plan.price × duration` in exact decimal arithmetic.
fn derive_terms(plan: &PlanRecord, start_date: NaiveDate) -> Result<(NaiveDate, Decimal)> {
    let months = u32::try_from(plan.duration).map_err(|_| Error::BadRequest {
        message: format!("Plan duration {} is not a valid month count", plan.duration),
    })?;

    let end_date = add_months(start_date, months).ok_or_else(|| Error::Internal {
        operation: "compute enrollment end date".to_string(),
    })?;

    let price = plan.price * Decimal::from(plan.duration);

    Ok((end_date, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::EnrollmentEventKind;
    use crate::test_utils::{FixedClock, MemStores, date, dec, lifecycle_manager, utc};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_create_derives_window_and_price() {
        let stores = MemStores::new();
        let student = stores.add_student("Ana Souza", "ana@example.com");
        let plan = stores.add_plan("Gold", 3, dec("109.00"));
        let clock = FixedClock::at(utc(2024, 1, 10, 9, 0, 0));
        let (manager, mut events) = lifecycle_manager(&stores, clock);

        let record = manager
            .create(NewEnrollment {
                student_id: student.id,
                plan_id: plan.id,
                start_date: date(2024, 1, 15),
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap();

        assert_eq!(record.start_date, date(2024, 1, 15));
        assert_eq!(record.end_date, date(2024, 4, 15));
        assert_eq!(record.price, dec("327.00"));
        assert!(record.canceled_at.is_none());

        let event = events.try_recv().unwrap();
        assert_eq!(event.kind, EnrollmentEventKind::Created);
        assert_eq!(event.student_email, "ana@example.com");
        assert_eq!(event.plan_title, "Gold");
        assert_eq!(event.price, dec("327.00"));
    }

    #[tokio::test]
    async fn test_create_price_is_exact_decimal_math() {
        let stores = MemStores::new();
        let student = stores.add_student("Bia", "bia@example.com");
        // A price that would drift under binary floats
        let plan = stores.add_plan("Starter", 12, dec("19.99"));
        let clock = FixedClock::at(utc(2024, 1, 1, 0, 0, 0));
        let (manager, _events) = lifecycle_manager(&stores, clock);

        let record = manager
            .create(NewEnrollment {
                student_id: student.id,
                plan_id: plan.id,
                start_date: date(2024, 1, 1),
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap();

        assert_eq!(record.price, dec("239.88"));
        assert_eq!(record.end_date, date(2025, 1, 1));
    }

    #[tokio::test]
    async fn test_create_clamps_month_end() {
        let stores = MemStores::new();
        let student = stores.add_student("Caio", "caio@example.com");
        let plan = stores.add_plan("Monthly", 1, dec("89.90"));
        let clock = FixedClock::at(utc(2024, 1, 31, 8, 0, 0));
        let (manager, _events) = lifecycle_manager(&stores, clock);

        let record = manager
            .create(NewEnrollment {
                student_id: student.id,
                plan_id: plan.id,
                start_date: date(2024, 1, 31),
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap();

        assert_eq!(record.end_date, date(2024, 2, 29));
    }

    #[tokio::test]
    async fn test_create_unknown_student_and_plan() {
        let stores = MemStores::new();
        let plan = stores.add_plan("Gold", 3, dec("109.00"));
        let student = stores.add_student("Ana", "ana2@example.com");
        let clock = FixedClock::at(utc(2024, 1, 10, 9, 0, 0));
        let (manager, _events) = lifecycle_manager(&stores, clock);

        let err = manager
            .create(NewEnrollment {
                student_id: Uuid::new_v4(),
                plan_id: plan.id,
                start_date: date(2024, 1, 15),
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { resource: "Student" }));

        let err = manager
            .create(NewEnrollment {
                student_id: student.id,
                plan_id: Uuid::new_v4(),
                start_date: date(2024, 1, 15),
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { resource: "Plan" }));
    }

    #[tokio::test]
    async fn test_create_rejects_past_start_date() {
        let stores = MemStores::new();
        let student = stores.add_student("Dani", "dani@example.com");
        let plan = stores.add_plan("Gold", 3, dec("109.00"));
        let clock = FixedClock::at(utc(2024, 1, 10, 23, 59, 0));
        let (manager, _events) = lifecycle_manager(&stores, clock);

        let err = manager
            .create(NewEnrollment {
                student_id: student.id,
                plan_id: plan.id,
                start_date: date(2024, 1, 9),
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));

        // Same-day start is permitted even late in the day
        let record = manager
            .create(NewEnrollment {
                student_id: student.id,
                plan_id: plan.id,
                start_date: date(2024, 1, 10),
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap();
        assert_eq!(record.start_date, date(2024, 1, 10));
    }

    #[tokio::test]
    async fn test_create_rejects_second_active_enrollment() {
        let stores = MemStores::new();
        let student = stores.add_student("Edu", "edu@example.com");
        let plan = stores.add_plan("Gold", 3, dec("109.00"));
        let clock = FixedClock::at(utc(2024, 1, 10, 9, 0, 0));
        let (manager, _events) = lifecycle_manager(&stores, clock);

        let request = NewEnrollment {
            student_id: student.id,
            plan_id: plan.id,
            start_date: date(2024, 1, 15),
            created_by: Uuid::new_v4(),
        };

        manager.create(request.clone()).await.unwrap();
        let err = manager.create(request).await.unwrap_err();
        assert!(matches!(err, Error::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_creates_admit_exactly_one() {
        let stores = MemStores::new();
        let student = stores.add_student("Fabi", "fabi@example.com");
        let plan = stores.add_plan("Gold", 3, dec("109.00"));
        let clock = FixedClock::at(utc(2024, 1, 10, 9, 0, 0));
        let (manager, _events) = lifecycle_manager(&stores, clock);
        let manager = std::sync::Arc::new(manager);

        let request = NewEnrollment {
            student_id: student.id,
            plan_id: plan.id,
            start_date: date(2024, 1, 15),
            created_by: Uuid::new_v4(),
        };

        let (a, b) = tokio::join!(manager.create(request.clone()), manager.create(request.clone()));

        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one concurrent create may win");
        let conflict = if a.is_err() { a.unwrap_err() } else { b.unwrap_err() };
        assert!(matches!(conflict, Error::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_cancel_frees_student_for_new_enrollment() {
        let stores = MemStores::new();
        let student = stores.add_student("Gus", "gus@example.com");
        let plan = stores.add_plan("Gold", 3, dec("109.00"));
        let clock = FixedClock::at(utc(2024, 1, 10, 9, 0, 0));
        let (manager, _events) = lifecycle_manager(&stores, clock);

        let request = NewEnrollment {
            student_id: student.id,
            plan_id: plan.id,
            start_date: date(2024, 1, 15),
            created_by: Uuid::new_v4(),
        };

        let first = manager.create(request.clone()).await.unwrap();
        let canceled = manager.cancel(first.id).await.unwrap();
        assert!(canceled.canceled_at.is_some());

        // Cancel is not repeatable
        let err = manager.cancel(first.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { resource: "Enrollment" }));

        // The student can enroll again now
        manager.create(request).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_rederives_terms_and_notifies() {
        let stores = MemStores::new();
        let student = stores.add_student("Hugo", "hugo@example.com");
        let gold = stores.add_plan("Gold", 3, dec("109.00"));
        let diamond = stores.add_plan("Diamond", 6, dec("89.00"));
        let clock = FixedClock::at(utc(2024, 1, 10, 9, 0, 0));
        let (manager, mut events) = lifecycle_manager(&stores, clock);

        let created = manager
            .create(NewEnrollment {
                student_id: student.id,
                plan_id: gold.id,
                start_date: date(2024, 1, 15),
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap();
        let _ = events.try_recv();

        let updated = manager
            .update(
                created.id,
                EnrollmentChange {
                    student_id: student.id,
                    plan_id: diamond.id,
                    start_date: date(2024, 2, 1),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.plan_id, diamond.id);
        assert_eq!(updated.start_date, date(2024, 2, 1));
        assert_eq!(updated.end_date, date(2024, 8, 1));
        assert_eq!(updated.price, dec("534.00"));
        // student_id untouched
        assert_eq!(updated.student_id, student.id);

        let event = events.try_recv().unwrap();
        assert_eq!(event.kind, EnrollmentEventKind::Updated);
        assert_eq!(event.plan_title, "Diamond");
    }

    #[tokio::test]
    async fn test_update_rejects_student_reassignment() {
        let stores = MemStores::new();
        let student = stores.add_student("Iris", "iris@example.com");
        let other = stores.add_student("Ivo", "ivo@example.com");
        let plan = stores.add_plan("Gold", 3, dec("109.00"));
        let clock = FixedClock::at(utc(2024, 1, 10, 9, 0, 0));
        let (manager, _events) = lifecycle_manager(&stores, clock);

        let created = manager
            .create(NewEnrollment {
                student_id: student.id,
                plan_id: plan.id,
                start_date: date(2024, 1, 15),
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap();

        let err = manager
            .update(
                created.id,
                EnrollmentChange {
                    student_id: other.id,
                    plan_id: plan.id,
                    start_date: date(2024, 2, 1),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::OwnershipViolation));
    }

    #[tokio::test]
    async fn test_update_missing_enrollment_and_past_date() {
        let stores = MemStores::new();
        let student = stores.add_student("Joao", "joao@example.com");
        let plan = stores.add_plan("Gold", 3, dec("109.00"));
        let clock = FixedClock::at(utc(2024, 1, 10, 9, 0, 0));
        let (manager, _events) = lifecycle_manager(&stores, clock);

        let err = manager
            .update(
                Uuid::new_v4(),
                EnrollmentChange {
                    student_id: student.id,
                    plan_id: plan.id,
                    start_date: date(2024, 2, 1),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { resource: "Enrollment" }));

        let created = manager
            .create(NewEnrollment {
                student_id: student.id,
                plan_id: plan.id,
                start_date: date(2024, 1, 15),
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap();

        let err = manager
            .update(
                created.id,
                EnrollmentChange {
                    student_id: student.id,
                    plan_id: plan.id,
                    start_date: date(2024, 1, 1),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
    }

    #[tokio::test]
    async fn test_notification_failure_does_not_roll_back() {
        let stores = MemStores::new();
        let student = stores.add_student("Kim", "kim@example.com");
        let plan = stores.add_plan("Gold", 3, dec("109.00"));
        let clock = FixedClock::at(utc(2024, 1, 10, 9, 0, 0));
        let (manager, events) = lifecycle_manager(&stores, clock);
        // Simulate a dead notification worker
        drop(events);

        let record = manager
            .create(NewEnrollment {
                student_id: student.id,
                plan_id: plan.id,
                start_date: date(2024, 1, 15),
                created_by: Uuid::new_v4(),
            })
            .await
            .unwrap();

        // The enrollment persisted regardless
        assert!(stores.enrollment_by_id(record.id).is_some());
    }
}
