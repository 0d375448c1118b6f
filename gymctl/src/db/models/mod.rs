//! Database record models matching table schemas.
//!
//! Each struct here corresponds to a table row and derives `sqlx::FromRow`
//! for query results. Database models are distinct from API models
//! ([`crate::api::models`]) so storage and API representations can evolve
//! independently; conversions live on the API side.

pub mod checkins;
pub mod enrollments;
pub mod files;
pub mod notifications;
pub mod plans;
pub mod students;
pub mod users;
