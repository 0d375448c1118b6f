//! Database repository for students.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::students::{StudentCreateDBRequest, StudentRecord, StudentUpdateDBRequest},
};
use crate::types::{StudentId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Students<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Students<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, email), err)]
    pub async fn get_student_by_email(&mut self, email: &str) -> Result<Option<StudentRecord>> {
        let student = sqlx::query_as::<_, StudentRecord>("SELECT * FROM students WHERE email = $1")
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(student)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Students<'c> {
    type CreateRequest = StudentCreateDBRequest;
    type UpdateRequest = StudentUpdateDBRequest;
    type Response = StudentRecord;
    type Id = StudentId;

    #[instrument(skip(self, request), fields(email = %request.email), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let student = sqlx::query_as::<_, StudentRecord>(
            r#"
            INSERT INTO students (name, email, age, weight, height)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.email)
        .bind(request.age)
        .bind(request.weight)
        .bind(request.height)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(student)
    }

    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let student = sqlx::query_as::<_, StudentRecord>("SELECT * FROM students WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(student)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<Self::Response>> {
        let students = sqlx::query_as::<_, StudentRecord>("SELECT * FROM students ORDER BY created_at DESC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(students)
    }

    #[instrument(skip(self, request), fields(student_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let student = sqlx::query_as::<_, StudentRecord>(
            r#"
            UPDATE students SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                age = COALESCE($4, age),
                weight = COALESCE($5, weight),
                height = COALESCE($6, height),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(request.age)
        .bind(request.weight)
        .bind(request.height)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(student)
    }

    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
