use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    api::models::{notifications::NotificationResponse, users::CurrentUser},
    db::handlers::{Notifications, Repository, Students},
    errors::Error,
    types::StudentId,
};

/// A student's enrollment notifications, newest first
#[utoipa::path(
    get,
    path = "/students/{id}/notifications",
    tag = "notifications",
    responses(
        (status = 200, description = "Notifications, newest first", body = [NotificationResponse]),
        (status = 400, description = "Student does not exist"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_notifications(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<StudentId>,
) -> Result<Json<Vec<NotificationResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    Students::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or(Error::NotFound { resource: "Student" })?;

    let notifications = Notifications::new(&mut conn).list_by_student(id).await?;

    Ok(Json(notifications.into_iter().map(NotificationResponse::from).collect()))
}
