//! Database repository for check-in events.

use crate::db::{errors::Result, models::checkins::CheckinRecord};
use crate::types::{StudentId, abbrev_uuid};
use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Checkins<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Checkins<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Record a check-in stamped with the engine's clock reading, not the
    /// database's.
    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&student_id)), err)]
    pub async fn create(&mut self, student_id: StudentId, at: DateTime<Utc>) -> Result<CheckinRecord> {
        let checkin = sqlx::query_as::<_, CheckinRecord>(
            r#"
            INSERT INTO checkins (student_id, created_at)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(student_id)
        .bind(at)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(checkin)
    }

    /// Check-ins within `[from, to)`, used for quota accounting.
    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&student_id)), err)]
    pub async fn find_by_student_in_range(
        &mut self,
        student_id: StudentId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CheckinRecord>> {
        let checkins = sqlx::query_as::<_, CheckinRecord>(
            "SELECT * FROM checkins WHERE student_id = $1 AND created_at >= $2 AND created_at < $3 ORDER BY created_at",
        )
        .bind(student_id)
        .bind(from)
        .bind(to)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(checkins)
    }

    /// Full history for a student, newest first.
    #[instrument(skip(self), fields(student_id = %abbrev_uuid(&student_id)), err)]
    pub async fn list_by_student(&mut self, student_id: StudentId) -> Result<Vec<CheckinRecord>> {
        let checkins =
            sqlx::query_as::<_, CheckinRecord>("SELECT * FROM checkins WHERE student_id = $1 ORDER BY created_at DESC")
                .bind(student_id)
                .fetch_all(&mut *self.db)
                .await?;

        Ok(checkins)
    }
}
