//! Database models for students.

use crate::types::StudentId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A row in `students`.
#[derive(Debug, Clone, FromRow)]
pub struct StudentRecord {
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub weight: Decimal,
    pub height: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StudentCreateDBRequest {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub weight: Decimal,
    pub height: Decimal,
}

/// `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct StudentUpdateDBRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub weight: Option<Decimal>,
    pub height: Option<Decimal>,
}
