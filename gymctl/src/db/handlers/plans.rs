//! Database repository for membership plans.

use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::plans::{PlanCreateDBRequest, PlanRecord, PlanUpdateDBRequest},
};
use crate::types::{PlanId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Plans<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Plans<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, title), err)]
    pub async fn get_plan_by_title(&mut self, title: &str) -> Result<Option<PlanRecord>> {
        let plan = sqlx::query_as::<_, PlanRecord>("SELECT * FROM plans WHERE title = $1")
            .bind(title)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(plan)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Plans<'c> {
    type CreateRequest = PlanCreateDBRequest;
    type UpdateRequest = PlanUpdateDBRequest;
    type Response = PlanRecord;
    type Id = PlanId;

    #[instrument(skip(self, request), fields(title = %request.title), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let plan = sqlx::query_as::<_, PlanRecord>(
            r#"
            INSERT INTO plans (title, duration, price)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&request.title)
        .bind(request.duration)
        .bind(request.price)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(plan)
    }

    #[instrument(skip(self), fields(plan_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let plan = sqlx::query_as::<_, PlanRecord>("SELECT * FROM plans WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(plan)
    }

    #[instrument(skip(self), err)]
    async fn list(&mut self) -> Result<Vec<Self::Response>> {
        let plans = sqlx::query_as::<_, PlanRecord>("SELECT * FROM plans ORDER BY created_at DESC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(plans)
    }

    #[instrument(skip(self, request), fields(plan_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let plan = sqlx::query_as::<_, PlanRecord>(
            r#"
            UPDATE plans SET
                title = COALESCE($2, title),
                duration = COALESCE($3, duration),
                price = COALESCE($4, price),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&request.title)
        .bind(request.duration)
        .bind(request.price)
        .fetch_optional(&mut *self.db)
        .await?
        .ok_or(DbError::NotFound)?;

        Ok(plan)
    }

    #[instrument(skip(self), fields(plan_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM plans WHERE id = $1").bind(id).execute(&mut *self.db).await?;

        Ok(result.rows_affected() > 0)
    }
}
