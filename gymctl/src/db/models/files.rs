//! Database models for uploaded files.

use crate::types::FileId;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A row in `files`. `name` is the original filename as uploaded; `path` is
/// the generated on-disk name.
#[derive(Debug, Clone, FromRow)]
pub struct FileRecord {
    pub id: FileId,
    pub name: String,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FileCreateDBRequest {
    pub name: String,
    pub path: String,
}
