//! API models for administrator login.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::users::UserResponse;
use crate::errors::Error;
use crate::validate::ConstraintSet;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SessionRequest {
    pub email: String,
    pub password: String,
}

impl SessionRequest {
    pub fn validate(&self) -> Result<(), Error> {
        let mut set = ConstraintSet::new();
        set.email("email", &self.email).min_len("password", &self.password, 6);
        set.finish()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub token: String,
}
