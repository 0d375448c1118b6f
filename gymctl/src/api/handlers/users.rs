use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    AppState,
    api::models::users::{CurrentUser, UserCreate, UserResponse, UserUpdate},
    auth::password,
    db::{
        handlers::{Files, Repository, Users},
        models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    },
    errors::Error,
    types::UserId,
};

/// Register a new administrative user. The only public write endpoint
/// besides login; everything else requires a session.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserCreate,
    tag = "users",
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid input or email already taken"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(State(state): State<AppState>, Json(request): Json<UserCreate>) -> Result<Json<UserResponse>, Error> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut conn);

    if user_repo.get_user_by_email(&request.email).await?.is_some() {
        return Err(Error::Conflict {
            message: "User already exists".to_string(),
        });
    }

    // Hash the password on a blocking thread to avoid blocking async runtime
    let password = request.password.clone();
    let password_hash = tokio::task::spawn_blocking(move || password::hash_string(&password))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("spawn password hashing task: {e}"),
        })??;

    let created = user_repo
        .create(&UserCreateDBRequest {
            name: request.name,
            email: request.email,
            password_hash,
            avatar_id: None,
        })
        .await?;

    Ok(Json(UserResponse::from(created)))
}

/// List users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = [UserResponse]),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(State(state): State<AppState>, _current_user: CurrentUser) -> Result<Json<Vec<UserResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let users = Users::new(&mut conn).list().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get a user by id
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    responses(
        (status = 200, description = "The user", body = UserResponse),
        (status = 400, description = "User does not exist"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_user(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<UserId>,
) -> Result<Json<UserResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let user = Users::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or(Error::NotFound { resource: "User" })?;

    Ok(Json(UserResponse::from(user)))
}

/// Update the authenticated user's own profile
#[utoipa::path(
    put,
    path = "/users",
    request_body = UserUpdate,
    tag = "users",
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Not authenticated or password mismatch"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<UserUpdate>,
) -> Result<Json<UserResponse>, Error> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut user_repo = Users::new(&mut conn);

    let user = user_repo
        .get_by_id(current_user.id)
        .await?
        .ok_or(Error::NotFound { resource: "User" })?;

    // Email changes must not collide with another account
    if let Some(email) = &request.email
        && email != &user.email
        && user_repo.get_user_by_email(email).await?.is_some()
    {
        return Err(Error::Conflict {
            message: "User already exists".to_string(),
        });
    }

    // Password changes must present the current password
    let password_hash = if let Some(new_password) = &request.password {
        let old_password = request.old_password.clone().unwrap_or_default();
        let hash = user.password_hash.clone();
        let old_matches = tokio::task::spawn_blocking(move || password::verify_string(&old_password, &hash))
            .await
            .map_err(|e| Error::Internal {
                operation: format!("spawn password verification task: {e}"),
            })??;

        if !old_matches {
            return Err(Error::Unauthenticated {
                message: Some("Password does not match".to_string()),
            });
        }

        let new_password = new_password.clone();
        let hashed = tokio::task::spawn_blocking(move || password::hash_string(&new_password))
            .await
            .map_err(|e| Error::Internal {
                operation: format!("spawn password hashing task: {e}"),
            })??;
        Some(hashed)
    } else {
        None
    };

    // A referenced avatar must exist
    if let Some(avatar_id) = request.avatar_id
        && Files::new(&mut conn).get_by_id(avatar_id).await?.is_none()
    {
        return Err(Error::NotFound { resource: "File" });
    }

    let mut user_repo = Users::new(&mut conn);
    let updated = user_repo
        .update(
            current_user.id,
            &UserUpdateDBRequest {
                name: request.name,
                email: request.email,
                password_hash,
                avatar_id: request.avatar_id,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "User does not exist"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_user(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<UserId>,
) -> Result<Json<Value>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = Users::new(&mut conn).delete(id).await?;

    if !deleted {
        return Err(Error::NotFound { resource: "User" });
    }

    Ok(Json(json!({ "message": "User deleted successfully" })))
}
