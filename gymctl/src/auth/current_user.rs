//! Extractor resolving the authenticated administrative user.
//!
//! Administrative handlers take a [`CurrentUser`] argument; the extractor
//! reads the `Authorization: Bearer <token>` header and verifies the JWT
//! session. Requests without a valid token are rejected with 401 before the
//! handler body runs.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{instrument, trace};

use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    errors::{Error, Result},
};

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or(Error::Unauthenticated { message: None })?;

        let auth_str = auth_header.to_str().map_err(|e| Error::BadRequest {
            message: format!("Invalid authorization header: {e}"),
        })?;

        // Check for Bearer token format
        let token = auth_str.strip_prefix("Bearer ").ok_or(Error::Unauthenticated {
            message: Some("Authorization header must be a Bearer token".to_string()),
        })?;

        let user = session::verify_session_token(token, &state.config)?;
        trace!("Authenticated user: {}", user.email);

        Ok(user)
    }
}
