use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::{
        sessions::{SessionRequest, SessionResponse},
        users::{CurrentUser, UserResponse},
    },
    auth::{password, session},
    db::handlers::Users,
    errors::Error,
};

/// Login with email and password
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = SessionRequest,
    tag = "sessions",
    responses(
        (status = 200, description = "Login successful", body = SessionResponse),
        (status = 401, description = "Invalid credentials"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_session(State(state): State<AppState>, Json(request): Json<SessionRequest>) -> Result<Json<SessionResponse>, Error> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut conn);

    // Find user by email
    let user = user_repo
        .get_user_by_email(&request.email)
        .await?
        .ok_or_else(|| Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        })?;

    // Verify password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let hash = user.password_hash.clone();
    let is_valid = tokio::task::spawn_blocking(move || password::verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password verification task: {e}"),
        })??;

    if !is_valid {
        return Err(Error::Unauthenticated {
            message: Some("Invalid email or password".to_string()),
        });
    }

    let current_user = CurrentUser::from(user.clone());
    let token = session::create_session_token(&current_user, &state.config)?;

    Ok(Json(SessionResponse {
        user: UserResponse::from(user),
        token,
    }))
}
