//! Database repository for enrollments.
//!
//! Enrollments do not fit the generic [`super::repository::Repository`]
//! shape: the update request rewrites derived fields as a unit, and deletion
//! is a soft cancel that needs the caller's timestamp. The repository exposes
//! purpose-built methods instead.

use crate::db::{
    errors::{DbError, Result},
    models::enrollments::{EnrollmentCreateDBRequest, EnrollmentRecord, EnrollmentUpdateDBRequest},
};
use crate::types::{EnrollmentId, StudentId, abbrev_uuid};
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Enrollments<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Enrollments<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(student_id = %abbrev_uuid(&request.student_id)), err)]
    pub async fn create(&mut self, request: &EnrollmentCreateDBRequest) -> Result<EnrollmentRecord> {
        let enrollment = sqlx::query_as::<_, EnrollmentRecord>(
            r#"
            INSERT INTO enrollments (student_id, plan_id, start_date, end_date, price, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(request.student_id)
        .bind(request.plan_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.price)
        .bind(request.created_by)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(enrollment)
    }

    #[instrument(skip(self), fields(enrollment_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&mut self, id: EnrollmentId) -> Result<Option<EnrollmentRecord>> {
        let enrollment = sqlx::query_as::<_, EnrollmentRecord>("SELECT * FROM enrollments WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(enrollment)
    }

    #[instrument(skip(self), err)]
    pub async fn list(&mut self) -> Result<Vec<EnrollmentRecord>> {
        let enrollments = sqlx::query_as::<_, EnrollmentRecord>("SELECT * FROM enrollments ORDER BY created_at DESC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(enrollments)
    }

    /// The student's current active (non-canceled) enrollment, if any.
    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&student_id)), err)]
    pub async fn find_active_by_student(&mut self, student_id: StudentId) -> Result<Option<EnrollmentRecord>> {
        let enrollment =
            sqlx::query_as::<_, EnrollmentRecord>("SELECT * FROM enrollments WHERE student_id = $1 AND canceled_at IS NULL")
                .bind(student_id)
                .fetch_optional(&mut *self.db)
                .await?;

        Ok(enrollment)
    }

    /// Every enrollment the student ever had, canceled ones included.
    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&student_id)), err)]
    pub async fn list_by_student(&mut self, student_id: StudentId) -> Result<Vec<EnrollmentRecord>> {
        let enrollments =
            sqlx::query_as::<_, EnrollmentRecord>("SELECT * FROM enrollments WHERE student_id = $1 ORDER BY start_date")
                .bind(student_id)
                .fetch_all(&mut *self.db)
                .await?;

        Ok(enrollments)
    }

    /// Rewrite the plan reference, window and derived price as one statement.
    #[instrument(skip(self, request), fields(enrollment_id = %abbrev_uuid(&id)), err)]
    pub async fn update(&mut self, id: EnrollmentId, request: &EnrollmentUpdateDBRequest) -> Result<EnrollmentRecord> {
        let enrollment = sqlx::query_as::<_, EnrollmentRecord>(
            r#"
            UPDATE enrollments SET
                plan_id = $2,
                start_date = $3,
                end_date = $4,
                price = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.plan_id)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.price)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(enrollment)
    }

    /// Soft-delete: set `canceled_at` once. Rows already canceled are left
    /// untouched (`canceled_at` is immutable after the first write).
    #[instrument(skip(self), fields(enrollment_id = %abbrev_uuid(&id)), err)]
    pub async fn cancel(&mut self, id: EnrollmentId, at: DateTime<Utc>) -> Result<EnrollmentRecord> {
        let enrollment = sqlx::query_as::<_, EnrollmentRecord>(
            r#"
            UPDATE enrollments SET
                canceled_at = $2,
                updated_at = NOW()
            WHERE id = $1 AND canceled_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(at)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(enrollment)
    }
}
