//! API response models for uploaded files.

use crate::db::models::files::FileRecord;
use crate::types::FileId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: FileId,
    /// Original filename as uploaded
    pub name: String,
    /// Generated on-disk name
    pub path: String,
    /// Public URL the file is served under
    pub url: String,
    pub created_at: DateTime<Utc>,
}

impl FileResponse {
    pub fn from_record(db: FileRecord, base_url: &str) -> Self {
        let url = format!("{}/{}", base_url.trim_end_matches('/'), db.path);
        Self {
            id: db.id,
            name: db.name,
            path: db.path,
            url,
            created_at: db.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let record = FileRecord {
            id: uuid::Uuid::new_v4(),
            name: "avatar.png".to_string(),
            path: "abc123.png".to_string(),
            created_at: Utc::now(),
        };

        let response = FileResponse::from_record(record, "http://localhost:3333/files/");
        assert_eq!(response.url, "http://localhost:3333/files/abc123.png");
    }
}
