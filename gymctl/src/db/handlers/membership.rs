//! Postgres adapters behind the membership store traits.
//!
//! One pool-holding struct implements every collaborator contract the core
//! consumes, delegating to the per-table repositories. Each call acquires a
//! connection from the pool, so the pool's acquire timeout bounds how long
//! any store operation can wait on the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::db::errors::{DbError, Result};
use crate::db::handlers::{Checkins, Enrollments, Plans, Repository, Students};
use crate::db::models::{
    checkins::CheckinRecord,
    enrollments::{EnrollmentCreateDBRequest, EnrollmentRecord, EnrollmentUpdateDBRequest},
    plans::PlanRecord,
    students::StudentRecord,
};
use crate::membership::stores::{CheckinStore, EnrollmentStore, PlanCatalog, StudentDirectory};
use crate::types::{EnrollmentId, PlanId, StudentId};

#[derive(Clone)]
pub struct PgMembershipStores {
    pool: PgPool,
}

impl PgMembershipStores {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<sqlx::pool::PoolConnection<sqlx::Postgres>> {
        self.pool.acquire().await.map_err(DbError::from)
    }
}

#[async_trait]
impl PlanCatalog for PgMembershipStores {
    async fn plan_by_id(&self, id: PlanId) -> Result<Option<PlanRecord>> {
        let mut conn = self.conn().await?;
        Plans::new(&mut conn).get_by_id(id).await
    }
}

#[async_trait]
impl StudentDirectory for PgMembershipStores {
    async fn student_by_id(&self, id: StudentId) -> Result<Option<StudentRecord>> {
        let mut conn = self.conn().await?;
        Students::new(&mut conn).get_by_id(id).await
    }
}

#[async_trait]
impl EnrollmentStore for PgMembershipStores {
    async fn find_by_id(&self, id: EnrollmentId) -> Result<Option<EnrollmentRecord>> {
        let mut conn = self.conn().await?;
        Enrollments::new(&mut conn).get_by_id(id).await
    }

    async fn find_active_by_student(&self, student_id: StudentId) -> Result<Option<EnrollmentRecord>> {
        let mut conn = self.conn().await?;
        Enrollments::new(&mut conn).find_active_by_student(student_id).await
    }

    async fn list_by_student(&self, student_id: StudentId) -> Result<Vec<EnrollmentRecord>> {
        let mut conn = self.conn().await?;
        Enrollments::new(&mut conn).list_by_student(student_id).await
    }

    async fn create(&self, request: &EnrollmentCreateDBRequest) -> Result<EnrollmentRecord> {
        let mut conn = self.conn().await?;
        Enrollments::new(&mut conn).create(request).await
    }

    async fn update(&self, id: EnrollmentId, request: &EnrollmentUpdateDBRequest) -> Result<EnrollmentRecord> {
        let mut conn = self.conn().await?;
        Enrollments::new(&mut conn).update(id, request).await
    }

    async fn cancel(&self, id: EnrollmentId, at: DateTime<Utc>) -> Result<EnrollmentRecord> {
        let mut conn = self.conn().await?;
        Enrollments::new(&mut conn).cancel(id, at).await
    }
}

#[async_trait]
impl CheckinStore for PgMembershipStores {
    async fn create(&self, student_id: StudentId, at: DateTime<Utc>) -> Result<CheckinRecord> {
        let mut conn = self.conn().await?;
        Checkins::new(&mut conn).create(student_id, at).await
    }

    async fn find_by_student_in_range(
        &self,
        student_id: StudentId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CheckinRecord>> {
        let mut conn = self.conn().await?;
        Checkins::new(&mut conn).find_by_student_in_range(student_id, from, to).await
    }

    async fn list_by_student(&self, student_id: StudentId) -> Result<Vec<CheckinRecord>> {
        let mut conn = self.conn().await?;
        Checkins::new(&mut conn).list_by_student(student_id).await
    }
}
