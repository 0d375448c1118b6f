use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    api::models::checkins::{CheckinRequest, CheckinResponse},
    errors::Error,
    types::StudentId,
};

/// Attempt a check-in for a student.
///
/// Student-facing and unauthenticated; the payload's `student_id` must match
/// the path, which is what keeps one student from checking in as another.
#[utoipa::path(
    post,
    path = "/students/{id}/checkins",
    request_body = CheckinRequest,
    tag = "checkins",
    responses(
        (status = 200, description = "Check-in admitted", body = CheckinResponse),
        (status = 400, description = "Outside the membership window or over quota"),
        (status = 401, description = "Claimed identity does not match the path student"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_checkin(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    Json(request): Json<CheckinRequest>,
) -> Result<Json<CheckinResponse>, Error> {
    let checkin = state.checkin.attempt(id, request.student_id).await?;

    Ok(Json(CheckinResponse::from(checkin)))
}

/// A student's check-in history, newest first
#[utoipa::path(
    get,
    path = "/students/{id}/checkins",
    tag = "checkins",
    responses(
        (status = 200, description = "Check-ins, newest first", body = [CheckinResponse]),
        (status = 400, description = "Student does not exist"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_checkins(State(state): State<AppState>, Path(id): Path<StudentId>) -> Result<Json<Vec<CheckinResponse>>, Error> {
    let checkins = state.checkin.history(id).await?;

    Ok(Json(checkins.into_iter().map(CheckinResponse::from).collect()))
}
