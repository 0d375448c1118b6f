//! OpenAPI document assembled from the handler annotations.

use utoipa::OpenApi;

use crate::api::models::{
    checkins::{CheckinRequest, CheckinResponse},
    enrollments::{EnrollmentCreate, EnrollmentResponse, EnrollmentUpdate},
    files::FileResponse,
    notifications::NotificationResponse,
    plans::{PlanCreate, PlanResponse, PlanUpdate},
    sessions::{SessionRequest, SessionResponse},
    students::{StudentCreate, StudentResponse, StudentUpdate},
    users::{CurrentUser, UserCreate, UserResponse, UserUpdate},
};
use crate::validate::FieldError;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::sessions::create_session,
        crate::api::handlers::users::create_user,
        crate::api::handlers::users::list_users,
        crate::api::handlers::users::get_user,
        crate::api::handlers::users::update_user,
        crate::api::handlers::users::delete_user,
        crate::api::handlers::students::create_student,
        crate::api::handlers::students::list_students,
        crate::api::handlers::students::get_student,
        crate::api::handlers::students::update_student,
        crate::api::handlers::students::delete_student,
        crate::api::handlers::plans::create_plan,
        crate::api::handlers::plans::list_plans,
        crate::api::handlers::plans::get_plan,
        crate::api::handlers::plans::update_plan,
        crate::api::handlers::plans::delete_plan,
        crate::api::handlers::enrollments::create_enrollment,
        crate::api::handlers::enrollments::list_enrollments,
        crate::api::handlers::enrollments::get_enrollment,
        crate::api::handlers::enrollments::update_enrollment,
        crate::api::handlers::enrollments::delete_enrollment,
        crate::api::handlers::checkins::create_checkin,
        crate::api::handlers::checkins::list_checkins,
        crate::api::handlers::files::upload_file,
        crate::api::handlers::files::list_files,
        crate::api::handlers::notifications::list_notifications,
    ),
    components(schemas(
        SessionRequest,
        SessionResponse,
        UserCreate,
        UserUpdate,
        UserResponse,
        CurrentUser,
        StudentCreate,
        StudentUpdate,
        StudentResponse,
        PlanCreate,
        PlanUpdate,
        PlanResponse,
        EnrollmentCreate,
        EnrollmentUpdate,
        EnrollmentResponse,
        CheckinRequest,
        CheckinResponse,
        FileResponse,
        NotificationResponse,
        FieldError,
    )),
    tags(
        (name = "sessions", description = "Administrator login"),
        (name = "users", description = "Staff account management"),
        (name = "students", description = "Student records"),
        (name = "plans", description = "Membership plans"),
        (name = "enrollments", description = "Enrollment lifecycle"),
        (name = "checkins", description = "Check-in attempts and history"),
        (name = "files", description = "Avatar uploads"),
        (name = "notifications", description = "Enrollment notification feed"),
    ),
    info(
        title = "gymctl",
        description = "Gym membership control layer: enrollment lifecycle and check-in eligibility"
    )
)]
pub struct ApiDoc;
