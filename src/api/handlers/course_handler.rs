//! Course catalogue handlers (Admin).

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::JsonInput;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{Course, CourseInput};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_courses))
        .route("/Details/:id", get(course_details))
        .route("/Create", get(create_form).post(create_course))
        .route("/Edit/:id", get(edit_form).post(update_course))
        .route("/Delete/:id", get(confirm_delete).post(delete_course))
}

#[utoipa::path(
    get,
    path = "/Courses",
    tag = "Courses",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All courses", body = Vec<Course>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_courses(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Course>>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.courses().list().await?))
}

#[utoipa::path(
    get,
    path = "/Courses/Details/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = Course),
        (status = 404, description = "Course not found")
    )
)]
pub async fn course_details(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Course>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.courses().get(id).await?))
}

#[utoipa::path(
    get,
    path = "/Courses/Create",
    tag = "Courses",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Empty course input", body = CourseInput))
)]
pub async fn create_form(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<CourseInput>> {
    require_admin(&current_user)?;
    Ok(Json(CourseInput::default()))
}

#[utoipa::path(
    post,
    path = "/Courses/Create",
    tag = "Courses",
    security(("bearer_auth" = [])),
    request_body = CourseInput,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Validation error or code already taken")
    )
)]
pub async fn create_course(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    JsonInput(payload): JsonInput<CourseInput>,
) -> AppResult<Created<Course>> {
    require_admin(&current_user)?;
    Ok(Created(state.services.courses().create(payload).await?))
}

#[utoipa::path(
    get,
    path = "/Courses/Edit/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Current values", body = CourseInput),
        (status = 404, description = "Course not found")
    )
)]
pub async fn edit_form(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<CourseInput>> {
    require_admin(&current_user)?;
    let course = state.services.courses().get(id).await?;
    Ok(Json(CourseInput::from(&course)))
}

#[utoipa::path(
    post,
    path = "/Courses/Edit/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Course ID")),
    request_body = CourseInput,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Course not found")
    )
)]
pub async fn update_course(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonInput(payload): JsonInput<CourseInput>,
) -> AppResult<Json<Course>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.courses().update(id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/Courses/Delete/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course to delete", body = Course),
        (status = 404, description = "Course not found")
    )
)]
pub async fn confirm_delete(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Course>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.courses().get(id).await?))
}

/// Delete a course no class uses
#[utoipa::path(
    post,
    path = "/Courses/Delete/{id}",
    tag = "Courses",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 404, description = "Course not found"),
        (status = 409, description = "Course is used by classes")
    )
)]
pub async fn delete_course(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&current_user)?;
    state.services.courses().delete(id).await?;
    Ok(Json(MessageResponse::new("Course deleted.")))
}
