//! Database models for membership plans.

use crate::types::PlanId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// A row in `plans`. `duration` is whole months; `price` is per month.
#[derive(Debug, Clone, FromRow)]
pub struct PlanRecord {
    pub id: PlanId,
    pub title: String,
    pub duration: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PlanCreateDBRequest {
    pub title: String,
    pub duration: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct PlanUpdateDBRequest {
    pub title: Option<String>,
    pub duration: Option<i32>,
    pub price: Option<Decimal>,
}
