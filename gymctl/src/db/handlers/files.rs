//! Database repository for uploaded file metadata.

use crate::db::{
    errors::Result,
    models::files::{FileCreateDBRequest, FileRecord},
};
use crate::types::{FileId, abbrev_uuid};
use sqlx::PgConnection;
use tracing::instrument;

pub struct Files<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Files<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    pub async fn create(&mut self, request: &FileCreateDBRequest) -> Result<FileRecord> {
        let file = sqlx::query_as::<_, FileRecord>(
            r#"
            INSERT INTO files (name, path)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.path)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(file)
    }

    #[instrument(skip(self), fields(file_id = %abbrev_uuid(&id)), err)]
    pub async fn get_by_id(&mut self, id: FileId) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(file)
    }

    #[instrument(skip(self), err)]
    pub async fn list(&mut self) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as::<_, FileRecord>("SELECT * FROM files ORDER BY created_at DESC")
            .fetch_all(&mut *self.db)
            .await?;

        Ok(files)
    }
}
