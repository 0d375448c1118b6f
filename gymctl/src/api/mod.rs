//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Sessions** (`/sessions`): administrator login
//! - **Users** (`/users`): staff account management
//! - **Students** (`/students`): student record CRUD
//! - **Plans** (`/plans`): membership plan CRUD
//! - **Enrollments** (`/enrollments`): enrollment lifecycle
//! - **Check-ins** (`/students/{id}/checkins`): student-facing check-in
//!   attempts and history
//! - **Files** (`/files`): avatar uploads
//! - **Notifications** (`/students/{id}/notifications`): enrollment
//!   notification feed
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`;
//! the rendered documentation is served at `/docs`.

pub mod handlers;
pub mod models;
