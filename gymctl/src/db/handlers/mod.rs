//! Repository implementations for database access.
//!
//! Each repository wraps a `&mut PgConnection`, provides strongly-typed
//! operations over one table, and returns records from
//! [`crate::db::models`]. The regular CRUD tables (users, students, plans)
//! implement the [`Repository`] trait; enrollments and check-ins have
//! purpose-built methods because their write shapes (derived-field rewrites,
//! soft cancel, clock-stamped events) do not fit the generic contract.
//!
//! [`membership::PgMembershipStores`] adapts these repositories to the
//! store traits the membership core consumes.

pub mod checkins;
pub mod enrollments;
pub mod files;
pub mod membership;
pub mod notifications;
pub mod plans;
pub mod repository;
pub mod students;
pub mod users;

pub use checkins::Checkins;
pub use enrollments::Enrollments;
pub use files::Files;
pub use notifications::Notifications;
pub use plans::Plans;
pub use repository::Repository;
pub use students::Students;
pub use users::Users;
