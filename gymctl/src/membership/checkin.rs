//! Check-in eligibility decisions.
//!
//! A check-in attempt is admitted only when the claimed identity matches the
//! path student, the current instant falls inside the membership window of
//! every enrollment on file, and neither the weekly nor the daily quota is
//! exhausted. Admitted attempts persist a check-in event stamped with the
//! engine's clock reading. The quota read and the event write run under the
//! student's lock, so one remaining quota slot can never admit two
//! concurrent attempts.

use std::sync::Arc;

use tracing::instrument;

use crate::clock::Clock;
use crate::db::models::checkins::CheckinRecord;
use crate::errors::{Error, Result};
use crate::membership::{StudentLocks, week_bounds};
use crate::membership::stores::{CheckinStore, EnrollmentStore, StudentDirectory};
use crate::types::{StudentId, abbrev_uuid};

pub struct CheckinEligibilityEngine {
    students: Arc<dyn StudentDirectory>,
    enrollments: Arc<dyn EnrollmentStore>,
    checkins: Arc<dyn CheckinStore>,
    clock: Arc<dyn Clock>,
    locks: Arc<StudentLocks>,
    weekly_limit: u32,
}

impl CheckinEligibilityEngine {
    pub fn new(
        students: Arc<dyn StudentDirectory>,
        enrollments: Arc<dyn EnrollmentStore>,
        checkins: Arc<dyn CheckinStore>,
        clock: Arc<dyn Clock>,
        locks: Arc<StudentLocks>,
        weekly_limit: u32,
    ) -> Self {
        Self {
            students,
            enrollments,
            checkins,
            clock,
            locks,
            weekly_limit,
        }
    }

    /// Decide admit/reject for one check-in attempt and persist the event on
    /// admission.
    ///
    /// `claimed_id` is the identity the caller supplied in the payload; it
    /// must match the student addressed by the path.
    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&student_id)), err)]
    pub async fn attempt(&self, student_id: StudentId, claimed_id: StudentId) -> Result<CheckinRecord> {
        let _guard = self.locks.acquire(student_id).await;

        let student = self
            .students
            .student_by_id(student_id)
            .await?
            .ok_or(Error::NotFound { resource: "Student" })?;

        if claimed_id != student.id {
            return Err(Error::Unauthorized {
                message: format!("Id entered for check in is invalid, your id is {}", student.id),
            });
        }

        let now = self.clock.now();
        let today = now.date_naive();

        let enrollments = self.enrollments.list_by_student(student_id).await?;
        if enrollments.is_empty() || enrollments.iter().any(|e| !e.window_contains(today)) {
            return Err(Error::OutOfWindow);
        }

        let (week_start, week_end) = week_bounds(today);
        let this_week = self.checkins.find_by_student_in_range(student_id, week_start, week_end).await?;

        if this_week.len() >= self.weekly_limit as usize {
            return Err(Error::QuotaExceeded { limit: self.weekly_limit });
        }

        if this_week.iter().any(|c| c.created_at.date_naive() == today) {
            return Err(Error::AlreadyCheckedInToday);
        }

        let checkin = self.checkins.create(student_id, now).await?;
        Ok(checkin)
    }

    /// A student's check-in history, newest first. Pure read; no eligibility
    /// logic beyond the student existing.
    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&student_id)), err)]
    pub async fn history(&self, student_id: StudentId) -> Result<Vec<CheckinRecord>> {
        self.students
            .student_by_id(student_id)
            .await?
            .ok_or(Error::NotFound { resource: "Student" })?;

        Ok(self.checkins.list_by_student(student_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FixedClock, MemStores, date, dec, eligibility_engine, utc};
    use uuid::Uuid;

    /// Student with an active Jan 1 - Feb 1 2024 membership.
    fn enrolled_student(stores: &Arc<MemStores>) -> crate::db::models::students::StudentRecord {
        let student = stores.add_student("Ana Souza", "ana@example.com");
        stores.add_enrollment(student.id, date(2024, 1, 1), date(2024, 2, 1));
        student
    }

    #[tokio::test]
    async fn test_attempt_inside_window_succeeds() {
        let stores = MemStores::new();
        let student = enrolled_student(&stores);
        let clock = FixedClock::at(utc(2024, 1, 15, 10, 30, 0));
        let engine = eligibility_engine(&stores, clock, 5);

        let checkin = engine.attempt(student.id, student.id).await.unwrap();
        assert_eq!(checkin.student_id, student.id);
        assert_eq!(checkin.created_at, utc(2024, 1, 15, 10, 30, 0));
    }

    #[tokio::test]
    async fn test_attempt_identity_mismatch_is_unauthorized() {
        let stores = MemStores::new();
        let student = enrolled_student(&stores);
        let clock = FixedClock::at(utc(2024, 1, 15, 10, 30, 0));
        let engine = eligibility_engine(&stores, clock, 5);

        // Everything else is satisfiable; the identity alone fails
        let err = engine.attempt(student.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::Unauthorized { .. }));

        // And nothing was persisted
        assert!(engine.history(student.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_attempt_unknown_student() {
        let stores = MemStores::new();
        let clock = FixedClock::at(utc(2024, 1, 15, 10, 30, 0));
        let engine = eligibility_engine(&stores, clock, 5);

        let ghost = Uuid::new_v4();
        let err = engine.attempt(ghost, ghost).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { resource: "Student" }));
    }

    #[tokio::test]
    async fn test_attempt_without_enrollment_is_out_of_window() {
        let stores = MemStores::new();
        let student = stores.add_student("Bia", "bia@example.com");
        let clock = FixedClock::at(utc(2024, 1, 15, 10, 30, 0));
        let engine = eligibility_engine(&stores, clock, 5);

        let err = engine.attempt(student.id, student.id).await.unwrap_err();
        assert!(matches!(err, Error::OutOfWindow));
    }

    #[tokio::test]
    async fn test_attempt_after_window_end_is_out_of_window() {
        let stores = MemStores::new();
        let student = enrolled_student(&stores);
        let clock = FixedClock::at(utc(2024, 2, 2, 9, 0, 0));
        let engine = eligibility_engine(&stores, clock, 5);

        let err = engine.attempt(student.id, student.id).await.unwrap_err();
        assert!(matches!(err, Error::OutOfWindow));
    }

    #[tokio::test]
    async fn test_window_boundaries_are_inclusive() {
        let stores = MemStores::new();
        let student = enrolled_student(&stores);

        // First day of the window
        let clock = FixedClock::at(utc(2024, 1, 1, 0, 30, 0));
        let engine = eligibility_engine(&stores, clock, 5);
        engine.attempt(student.id, student.id).await.unwrap();

        // Last day of the window, late in the evening
        let clock = FixedClock::at(utc(2024, 2, 1, 23, 0, 0));
        let engine = eligibility_engine(&stores, clock, 5);
        engine.attempt(student.id, student.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_weekly_quota_exhaustion_and_reset() {
        let stores = MemStores::new();
        let student = stores.add_student("Caio", "caio@example.com");
        stores.add_enrollment(student.id, date(2024, 1, 1), date(2024, 6, 1));

        // Mon Jan 15 .. Fri Jan 19, one per day (week is Sun Jan 14 - Sat Jan 20)
        for day in 15..20 {
            let clock = FixedClock::at(utc(2024, 1, day, 7, 0, 0));
            let engine = eligibility_engine(&stores, clock, 5);
            engine.attempt(student.id, student.id).await.unwrap();
        }

        // Sixth attempt the same week: quota exceeded, even on a fresh day
        let clock = FixedClock::at(utc(2024, 1, 20, 7, 0, 0));
        let engine = eligibility_engine(&stores, clock, 5);
        let err = engine.attempt(student.id, student.id).await.unwrap_err();
        assert!(matches!(err, Error::QuotaExceeded { limit: 5 }));

        // Sunday rolls the week over; the same student is admitted again
        let clock = FixedClock::at(utc(2024, 1, 21, 7, 0, 0));
        let engine = eligibility_engine(&stores, clock, 5);
        engine.attempt(student.id, student.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_daily_quota_rejects_second_same_day_attempt() {
        let stores = MemStores::new();
        let student = enrolled_student(&stores);

        let clock = FixedClock::at(utc(2024, 1, 15, 7, 0, 0));
        let engine = eligibility_engine(&stores, clock, 5);
        engine.attempt(student.id, student.id).await.unwrap();

        // Later the same calendar day
        let clock = FixedClock::at(utc(2024, 1, 15, 19, 45, 0));
        let engine = eligibility_engine(&stores, clock, 5);
        let err = engine.attempt(student.id, student.id).await.unwrap_err();
        assert!(matches!(err, Error::AlreadyCheckedInToday));

        // Next calendar day is fine again
        let clock = FixedClock::at(utc(2024, 1, 16, 6, 0, 0));
        let engine = eligibility_engine(&stores, clock, 5);
        engine.attempt(student.id, student.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_weekly_quota_checked_before_daily() {
        let stores = MemStores::new();
        let student = stores.add_student("Dani", "dani@example.com");
        stores.add_enrollment(student.id, date(2024, 1, 1), date(2024, 6, 1));

        // Five check-ins this week, the last one today
        for day in 15..20 {
            let clock = FixedClock::at(utc(2024, 1, day, 7, 0, 0));
            let engine = eligibility_engine(&stores, clock, 5);
            engine.attempt(student.id, student.id).await.unwrap();
        }

        // Same day as the fifth check-in: both ceilings are hit, the weekly
        // one reports first
        let clock = FixedClock::at(utc(2024, 1, 19, 20, 0, 0));
        let engine = eligibility_engine(&stores, clock, 5);
        let err = engine.attempt(student.id, student.id).await.unwrap_err();
        assert!(matches!(err, Error::QuotaExceeded { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_attempts_do_not_overrun_last_slot() {
        let stores = MemStores::new();
        let student = stores.add_student("Edu", "edu@example.com");
        stores.add_enrollment(student.id, date(2024, 1, 1), date(2024, 6, 1));

        // Four check-ins already this week, none today: one slot left
        for day in 15..19 {
            let clock = FixedClock::at(utc(2024, 1, day, 7, 0, 0));
            let engine = eligibility_engine(&stores, clock, 5);
            engine.attempt(student.id, student.id).await.unwrap();
        }

        let clock = FixedClock::at(utc(2024, 1, 19, 7, 0, 0));
        let engine = Arc::new(eligibility_engine(&stores, clock, 5));

        let (a, b) = tokio::join!(engine.attempt(student.id, student.id), engine.attempt(student.id, student.id));
        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "only the remaining quota slot may be admitted");
    }

    #[tokio::test]
    async fn test_history_newest_first() {
        let stores = MemStores::new();
        let student = enrolled_student(&stores);

        for (day, hour) in [(2, 8), (5, 9), (9, 7)] {
            let clock = FixedClock::at(utc(2024, 1, day, hour, 0, 0));
            let engine = eligibility_engine(&stores, clock, 5);
            engine.attempt(student.id, student.id).await.unwrap();
        }

        let clock = FixedClock::at(utc(2024, 1, 10, 0, 0, 0));
        let engine = eligibility_engine(&stores, clock, 5);
        let history = engine.history(student.id).await.unwrap();

        assert_eq!(history.len(), 3);
        assert!(
            history.windows(2).all(|w| w[0].created_at >= w[1].created_at),
            "history must be ordered newest first"
        );
        assert_eq!(history[0].created_at, utc(2024, 1, 9, 7, 0, 0));
    }
}
