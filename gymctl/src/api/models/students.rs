//! API request/response models for students.

use crate::db::models::students::StudentRecord;
use crate::errors::Error;
use crate::types::StudentId;
use crate::validate::ConstraintSet;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StudentCreate {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub weight: Decimal,
    pub height: Decimal,
}

impl StudentCreate {
    pub fn validate(&self) -> Result<(), Error> {
        let mut set = ConstraintSet::new();
        set.min_len("name", &self.name, 3)
            .email("email", &self.email)
            .positive("age", self.age)
            .positive_decimal("weight", self.weight)
            .positive_decimal("height", self.height);
        set.finish()
    }
}

/// Partial update; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StudentUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i32>,
    pub weight: Option<Decimal>,
    pub height: Option<Decimal>,
}

impl StudentUpdate {
    pub fn validate(&self) -> Result<(), Error> {
        let mut set = ConstraintSet::new();
        if let Some(name) = &self.name {
            set.min_len("name", name, 3);
        }
        if let Some(email) = &self.email {
            set.email("email", email);
        }
        if let Some(age) = self.age {
            set.positive("age", age);
        }
        if let Some(weight) = self.weight {
            set.positive_decimal("weight", weight);
        }
        if let Some(height) = self.height {
            set.positive_decimal("height", height);
        }
        set.finish()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub age: i32,
    #[schema(value_type = f64)]
    pub weight: Decimal,
    #[schema(value_type = f64)]
    pub height: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StudentRecord> for StudentResponse {
    fn from(db: StudentRecord) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            age: db.age,
            weight: db.weight,
            height: db.height,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_create_constraints() {
        let request = StudentCreate {
            name: "Jo".to_string(),
            email: "jo@example".to_string(),
            age: 0,
            weight: Decimal::ZERO,
            height: Decimal::from_str("-1.7").unwrap(),
        };

        let err = request.validate().unwrap_err();
        match err {
            Error::Validation { errors } => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["name", "email", "age", "weight", "height"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_update_validates_only_present_fields() {
        let update = StudentUpdate {
            age: Some(30),
            ..Default::default()
        };
        assert!(update.validate().is_ok());

        let update = StudentUpdate {
            age: Some(-1),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
