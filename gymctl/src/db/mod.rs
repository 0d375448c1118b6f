//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with PostgreSQL.
//! It follows the Repository pattern to provide clean abstractions over
//! database operations.
//!
//! # Modules
//!
//! - [`handlers`]: Repository implementations for CRUD operations, plus the
//!   Postgres adapters behind the membership store traits
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! # Transactions
//!
//! Repositories wrap a `&mut PgConnection`, so they work over a pool
//! connection for single-statement operations or over an SQLx transaction
//! when several statements must commit together. Per-student invariants are
//! serialized above this layer (see [`crate::membership`]); the partial
//! unique index on `enrollments` is the database-level backstop.

pub mod errors;
pub mod handlers;
pub mod models;
