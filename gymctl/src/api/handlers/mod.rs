//! HTTP request handlers for all API endpoints.
//!
//! Each handler is responsible for request validation, authentication where
//! the route demands it, business logic execution (directly against the
//! repositories for plain CRUD, through the membership core for enrollments
//! and check-ins), and response serialization.
//!
//! Handlers return [`crate::errors::Error`], which converts into the
//! structured JSON error responses and status codes of the public contract.

pub mod checkins;
pub mod enrollments;
pub mod files;
pub mod notifications;
pub mod plans;
pub mod sessions;
pub mod students;
pub mod users;
