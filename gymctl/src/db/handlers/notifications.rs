//! Database repository for notification records.

use crate::db::{
    errors::Result,
    models::notifications::{NotificationCreateDBRequest, NotificationRecord},
};
use crate::types::{StudentId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Notifications<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Notifications<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(student_id = %abbrev_uuid(&request.student_id)), err)]
    pub async fn create(&mut self, request: &NotificationCreateDBRequest) -> Result<NotificationRecord> {
        let notification = sqlx::query_as::<_, NotificationRecord>(
            r#"
            INSERT INTO notifications (student_id, content)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(request.student_id)
        .bind(&request.content)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(notification)
    }

    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&student_id)), err)]
    pub async fn list_by_student(&mut self, student_id: StudentId) -> Result<Vec<NotificationRecord>> {
        let notifications = sqlx::query_as::<_, NotificationRecord>(
            "SELECT * FROM notifications WHERE student_id = $1 ORDER BY created_at DESC",
        )
        .bind(student_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(notifications)
    }
}
