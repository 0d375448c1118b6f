//! Statically declared request validation.
//!
//! Each API request type declares a named constraint set as a `validate`
//! method built from the checks below. Violations are accumulated (not
//! abort-early) so the client sees every failing field at once, and the
//! result is a tagged outcome: `Ok(())` or [`Error::Validation`] carrying
//! field-level messages.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    #[schema(value_type = String)]
    pub field: &'static str,
    pub reason: String,
}

/// Accumulates field-level violations for one operation's constraint set.
#[derive(Debug, Default)]
pub struct ConstraintSet {
    errors: Vec<FieldError>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &'static str, reason: String) {
        self.errors.push(FieldError { field, reason });
    }

    /// Require a string to be at least `min` characters long.
    pub fn min_len(&mut self, field: &'static str, value: &str, min: usize) -> &mut Self {
        if value.chars().count() < min {
            self.fail(field, format!("must be at least {min} characters"));
        }
        self
    }

    /// Require a plausible email address (local part, `@`, domain).
    pub fn email(&mut self, field: &'static str, value: &str) -> &mut Self {
        let well_formed = match value.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'),
            None => false,
        };
        if !well_formed {
            self.fail(field, "must be a valid email address".to_string());
        }
        self
    }

    /// Require a strictly positive integer.
    pub fn positive(&mut self, field: &'static str, value: i32) -> &mut Self {
        if value <= 0 {
            self.fail(field, "must be a positive number".to_string());
        }
        self
    }

    /// Require a strictly positive decimal.
    pub fn positive_decimal(&mut self, field: &'static str, value: Decimal) -> &mut Self {
        if value <= Decimal::ZERO {
            self.fail(field, "must be a positive number".to_string());
        }
        self
    }

    /// Require a non-negative decimal.
    pub fn non_negative_decimal(&mut self, field: &'static str, value: Decimal) -> &mut Self {
        if value < Decimal::ZERO {
            self.fail(field, "must not be negative".to_string());
        }
        self
    }

    /// Record a violation that does not fit one of the stock checks.
    pub fn custom(&mut self, field: &'static str, reason: &str) -> &mut Self {
        self.fail(field, reason.to_string());
        self
    }

    /// Resolve the constraint set into a tagged validation result.
    pub fn finish(self) -> Result<(), Error> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation { errors: self.errors })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_all_violations() {
        let mut set = ConstraintSet::new();
        set.min_len("name", "ab", 3).email("email", "not-an-email").positive("age", 0);

        let err = set.finish().unwrap_err();
        match err {
            Error::Validation { errors } => {
                assert_eq!(errors.len(), 3);
                assert_eq!(errors[0].field, "name");
                assert_eq!(errors[1].field, "email");
                assert_eq!(errors[2].field, "age");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_input_passes() {
        let mut set = ConstraintSet::new();
        set.min_len("name", "Ana", 3)
            .email("email", "ana@example.com")
            .positive("age", 25)
            .positive_decimal("weight", Decimal::new(75, 0))
            .non_negative_decimal("price", Decimal::ZERO);
        assert!(set.finish().is_ok());
    }

    #[test]
    fn test_email_edge_cases() {
        for bad in ["", "@", "a@", "@b.com", "a@b", "a@.com", "a@com."] {
            let mut set = ConstraintSet::new();
            set.email("email", bad);
            assert!(set.finish().is_err(), "expected {bad:?} to be rejected");
        }

        let mut set = ConstraintSet::new();
        set.email("email", "user.name+tag@domain.co.uk");
        assert!(set.finish().is_ok());
    }
}
