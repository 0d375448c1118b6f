use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    api::models::{
        enrollments::{EnrollmentCreate, EnrollmentResponse, EnrollmentUpdate},
        users::CurrentUser,
    },
    db::handlers::Enrollments,
    errors::Error,
    membership::enrollment::{EnrollmentChange, NewEnrollment},
    types::EnrollmentId,
};

/// Enroll a student in a plan
#[utoipa::path(
    post,
    path = "/enrollments",
    request_body = EnrollmentCreate,
    tag = "enrollments",
    responses(
        (status = 200, description = "Enrollment created with derived window and price", body = EnrollmentResponse),
        (status = 400, description = "Unknown student/plan, duplicate active enrollment, or past start date"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_enrollment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<EnrollmentCreate>,
) -> Result<Json<EnrollmentResponse>, Error> {
    let record = state
        .enrollment
        .create(NewEnrollment {
            student_id: request.student_id,
            plan_id: request.plan_id,
            start_date: request.start_date,
            created_by: current_user.id,
        })
        .await?;

    Ok(Json(EnrollmentResponse::from(record)))
}

/// List enrollments
#[utoipa::path(
    get,
    path = "/enrollments",
    tag = "enrollments",
    responses(
        (status = 200, description = "All enrollments", body = [EnrollmentResponse]),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_enrollments(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> Result<Json<Vec<EnrollmentResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let enrollments = Enrollments::new(&mut conn).list().await?;

    Ok(Json(enrollments.into_iter().map(EnrollmentResponse::from).collect()))
}

/// Get an enrollment by id
#[utoipa::path(
    get,
    path = "/enrollments/{id}",
    tag = "enrollments",
    responses(
        (status = 200, description = "The enrollment", body = EnrollmentResponse),
        (status = 400, description = "Enrollment does not exist"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_enrollment(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<EnrollmentId>,
) -> Result<Json<EnrollmentResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let enrollment = Enrollments::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or(Error::NotFound { resource: "Enrollment" })?;

    Ok(Json(EnrollmentResponse::from(enrollment)))
}

/// Rewrite an enrollment's plan and start date
#[utoipa::path(
    put,
    path = "/enrollments/{id}",
    request_body = EnrollmentUpdate,
    tag = "enrollments",
    responses(
        (status = 200, description = "Updated enrollment with re-derived window and price", body = EnrollmentResponse),
        (status = 400, description = "Unknown enrollment/plan, student reassignment, or past start date"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_enrollment(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<EnrollmentId>,
    Json(request): Json<EnrollmentUpdate>,
) -> Result<Json<EnrollmentResponse>, Error> {
    let record = state
        .enrollment
        .update(
            id,
            EnrollmentChange {
                student_id: request.student_id,
                plan_id: request.plan_id,
                start_date: request.start_date,
            },
        )
        .await?;

    Ok(Json(EnrollmentResponse::from(record)))
}

/// Cancel an enrollment
#[utoipa::path(
    delete,
    path = "/enrollments/{id}",
    tag = "enrollments",
    responses(
        (status = 200, description = "Enrollment canceled"),
        (status = 400, description = "Enrollment does not exist"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<EnrollmentId>,
) -> Result<&'static str, Error> {
    state.enrollment.cancel(id).await?;

    Ok("The enrollment has been canceled")
}
