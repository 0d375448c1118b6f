//! API request/response models for membership plans.

use crate::db::models::plans::PlanRecord;
use crate::errors::Error;
use crate::types::PlanId;
use crate::validate::ConstraintSet;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PlanCreate {
    pub title: String,
    /// Duration in whole months
    pub duration: i32,
    /// Price per month
    #[schema(value_type = f64)]
    pub price: Decimal,
}

impl PlanCreate {
    pub fn validate(&self) -> Result<(), Error> {
        let mut set = ConstraintSet::new();
        set.min_len("title", &self.title, 3)
            .positive("duration", self.duration)
            .non_negative_decimal("price", self.price);
        set.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PlanUpdate {
    pub title: Option<String>,
    pub duration: Option<i32>,
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
}

impl PlanUpdate {
    pub fn validate(&self) -> Result<(), Error> {
        let mut set = ConstraintSet::new();
        if let Some(title) = &self.title {
            set.min_len("title", title, 3);
        }
        if let Some(duration) = self.duration {
            set.positive("duration", duration);
        }
        if let Some(price) = self.price {
            set.non_negative_decimal("price", price);
        }
        set.finish()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlanResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: PlanId,
    pub title: String,
    pub duration: i32,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlanRecord> for PlanResponse {
    fn from(db: PlanRecord) -> Self {
        Self {
            id: db.id,
            title: db.title,
            duration: db.duration,
            price: db.price,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
