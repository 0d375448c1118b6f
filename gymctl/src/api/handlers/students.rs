use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    api::models::{
        students::{StudentCreate, StudentResponse, StudentUpdate},
        users::CurrentUser,
    },
    db::{
        handlers::{Repository, Students},
        models::students::{StudentCreateDBRequest, StudentUpdateDBRequest},
    },
    errors::Error,
    types::StudentId,
};

/// Register a student
#[utoipa::path(
    post,
    path = "/students",
    request_body = StudentCreate,
    tag = "students",
    responses(
        (status = 200, description = "Student created", body = StudentResponse),
        (status = 400, description = "Invalid input or email already taken"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_student(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(request): Json<StudentCreate>,
) -> Result<Json<StudentResponse>, Error> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut student_repo = Students::new(&mut conn);

    if student_repo.get_student_by_email(&request.email).await?.is_some() {
        return Err(Error::Conflict {
            message: "Student already exists".to_string(),
        });
    }

    let created = student_repo
        .create(&StudentCreateDBRequest {
            name: request.name,
            email: request.email,
            age: request.age,
            weight: request.weight,
            height: request.height,
        })
        .await?;

    Ok(Json(StudentResponse::from(created)))
}

/// List students
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    responses(
        (status = 200, description = "All students", body = [StudentResponse]),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_students(State(state): State<AppState>, _current_user: CurrentUser) -> Result<Json<Vec<StudentResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let students = Students::new(&mut conn).list().await?;

    Ok(Json(students.into_iter().map(StudentResponse::from).collect()))
}

/// Get a student by id
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    responses(
        (status = 200, description = "The student", body = StudentResponse),
        (status = 400, description = "Student does not exist"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_student(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<StudentId>,
) -> Result<Json<StudentResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let student = Students::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or(Error::NotFound { resource: "Student" })?;

    Ok(Json(StudentResponse::from(student)))
}

/// Update a student
#[utoipa::path(
    put,
    path = "/students/{id}",
    request_body = StudentUpdate,
    tag = "students",
    responses(
        (status = 200, description = "Updated student", body = StudentResponse),
        (status = 400, description = "Invalid input or student does not exist"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_student(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<StudentId>,
    Json(request): Json<StudentUpdate>,
) -> Result<Json<StudentResponse>, Error> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut student_repo = Students::new(&mut conn);

    let student = student_repo
        .get_by_id(id)
        .await?
        .ok_or(Error::NotFound { resource: "Student" })?;

    // Email changes must not collide with another student
    if let Some(email) = &request.email
        && email != &student.email
        && student_repo.get_student_by_email(email).await?.is_some()
    {
        return Err(Error::Conflict {
            message: "Student already exists".to_string(),
        });
    }

    let updated = student_repo
        .update(
            id,
            &StudentUpdateDBRequest {
                name: request.name,
                email: request.email,
                age: request.age,
                weight: request.weight,
                height: request.height,
            },
        )
        .await?;

    Ok(Json(StudentResponse::from(updated)))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    responses(
        (status = 200, description = "Student deleted"),
        (status = 400, description = "Student does not exist"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_student(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<StudentId>,
) -> Result<StatusCode, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = Students::new(&mut conn).delete(id).await?;

    if !deleted {
        return Err(Error::NotFound { resource: "Student" });
    }

    Ok(StatusCode::OK)
}
