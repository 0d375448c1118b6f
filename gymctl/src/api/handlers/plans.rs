use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState,
    api::models::{
        plans::{PlanCreate, PlanResponse, PlanUpdate},
        users::CurrentUser,
    },
    db::{
        handlers::{Plans, Repository},
        models::plans::{PlanCreateDBRequest, PlanUpdateDBRequest},
    },
    errors::Error,
    types::PlanId,
};

/// Create a membership plan
#[utoipa::path(
    post,
    path = "/plans",
    request_body = PlanCreate,
    tag = "plans",
    responses(
        (status = 200, description = "Plan created", body = PlanResponse),
        (status = 400, description = "Invalid input or title already taken"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_plan(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(request): Json<PlanCreate>,
) -> Result<Json<PlanResponse>, Error> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut plan_repo = Plans::new(&mut conn);

    if plan_repo.get_plan_by_title(&request.title).await?.is_some() {
        return Err(Error::Conflict {
            message: "This plan already exists".to_string(),
        });
    }

    let created = plan_repo
        .create(&PlanCreateDBRequest {
            title: request.title,
            duration: request.duration,
            price: request.price,
        })
        .await?;

    Ok(Json(PlanResponse::from(created)))
}

/// List plans
#[utoipa::path(
    get,
    path = "/plans",
    tag = "plans",
    responses(
        (status = 200, description = "All plans", body = [PlanResponse]),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_plans(State(state): State<AppState>, _current_user: CurrentUser) -> Result<Json<Vec<PlanResponse>>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let plans = Plans::new(&mut conn).list().await?;

    Ok(Json(plans.into_iter().map(PlanResponse::from).collect()))
}

/// Get a plan by id
#[utoipa::path(
    get,
    path = "/plans/{id}",
    tag = "plans",
    responses(
        (status = 200, description = "The plan", body = PlanResponse),
        (status = 400, description = "Plan does not exist"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_plan(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<PlanId>,
) -> Result<Json<PlanResponse>, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let plan = Plans::new(&mut conn)
        .get_by_id(id)
        .await?
        .ok_or(Error::NotFound { resource: "Plan" })?;

    Ok(Json(PlanResponse::from(plan)))
}

/// Update a plan
#[utoipa::path(
    put,
    path = "/plans/{id}",
    request_body = PlanUpdate,
    tag = "plans",
    responses(
        (status = 200, description = "Updated plan", body = PlanResponse),
        (status = 400, description = "Invalid input or plan does not exist"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_plan(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<PlanId>,
    Json(request): Json<PlanUpdate>,
) -> Result<Json<PlanResponse>, Error> {
    request.validate()?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut plan_repo = Plans::new(&mut conn);

    let plan = plan_repo.get_by_id(id).await?.ok_or(Error::NotFound { resource: "Plan" })?;

    // Title changes must not collide with another plan
    if let Some(title) = &request.title
        && title != &plan.title
        && plan_repo.get_plan_by_title(title).await?.is_some()
    {
        return Err(Error::Conflict {
            message: "This plan already exists".to_string(),
        });
    }

    let updated = plan_repo
        .update(
            id,
            &PlanUpdateDBRequest {
                title: request.title,
                duration: request.duration,
                price: request.price,
            },
        )
        .await?;

    Ok(Json(PlanResponse::from(updated)))
}

/// Delete a plan
#[utoipa::path(
    delete,
    path = "/plans/{id}",
    tag = "plans",
    responses(
        (status = 200, description = "Plan deleted"),
        (status = 400, description = "Plan does not exist"),
        (status = 401, description = "Not authenticated"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_plan(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<PlanId>,
) -> Result<&'static str, Error> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let deleted = Plans::new(&mut conn).delete(id).await?;

    if !deleted {
        return Err(Error::NotFound { resource: "Plan" });
    }

    Ok("The plan has been deleted")
}
