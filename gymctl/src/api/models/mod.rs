//! API request and response data models.
//!
//! These structures define the public API contract. They are distinct from
//! the database models so storage and API representations can evolve
//! independently; conversions from records live here. Request types declare
//! their named constraint set as a `validate` method (see
//! [`crate::validate`]).

pub mod checkins;
pub mod enrollments;
pub mod files;
pub mod notifications;
pub mod plans;
pub mod sessions;
pub mod students;
pub mod users;
