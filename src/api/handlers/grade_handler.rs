//! Grade handlers. Teachers record grades; everyone signed in can read them.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::JsonInput;
use crate::api::middleware::{require_any, CurrentUser};
use crate::api::AppState;
use crate::domain::{GradeForm, GradeInput, GradeView, Role};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

const RECORDERS: &[Role] = &[Role::Teacher];

pub fn grade_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_grades))
        .route("/Details/:id", get(grade_details))
        .route("/Create", get(create_form).post(create_grade))
        .route("/Edit/:id", get(edit_form).post(update_grade))
        .route("/Delete/:id", get(confirm_delete).post(delete_grade))
        .route("/ViewOnly", get(view_only))
}

#[utoipa::path(
    get,
    path = "/Grades",
    tag = "Grades",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All grades", body = Vec<GradeView>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_grades(State(state): State<AppState>) -> AppResult<Json<Vec<GradeView>>> {
    Ok(Json(state.services.grades().list().await?))
}

#[utoipa::path(
    get,
    path = "/Grades/Details/{id}",
    tag = "Grades",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade", body = GradeView),
        (status = 404, description = "Grade not found")
    )
)]
pub async fn grade_details(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GradeView>> {
    Ok(Json(state.services.grades().get(id).await?))
}

/// Blank form; refused while there are no students or classes
#[utoipa::path(
    get,
    path = "/Grades/Create",
    tag = "Grades",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Create form", body = GradeForm),
        (status = 400, description = "No students or classes to grade"),
        (status = 403, description = "Forbidden - Teacher only")
    )
)]
pub async fn create_form(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<GradeForm>> {
    require_any(&current_user, RECORDERS)?;
    Ok(Json(state.services.grades().form(None).await?))
}

/// Record a grade
#[utoipa::path(
    post,
    path = "/Grades/Create",
    tag = "Grades",
    security(("bearer_auth" = [])),
    request_body = GradeInput,
    responses(
        (status = 201, description = "Grade recorded", body = GradeView),
        (status = 400, description = "Every field error, with the form to redisplay"),
        (status = 403, description = "Forbidden - Teacher only")
    )
)]
pub async fn create_grade(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    JsonInput(payload): JsonInput<GradeInput>,
) -> AppResult<Created<GradeView>> {
    require_any(&current_user, RECORDERS)?;
    Ok(Created(state.services.grades().create(payload).await?))
}

#[utoipa::path(
    get,
    path = "/Grades/Edit/{id}",
    tag = "Grades",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Edit form", body = GradeForm),
        (status = 404, description = "Grade not found")
    )
)]
pub async fn edit_form(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GradeForm>> {
    require_any(&current_user, RECORDERS)?;
    Ok(Json(state.services.grades().form(Some(id)).await?))
}

/// Edit a grade; pass the version read to detect concurrent changes
#[utoipa::path(
    post,
    path = "/Grades/Edit/{id}",
    tag = "Grades",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Grade ID")),
    request_body = GradeInput,
    responses(
        (status = 200, description = "Grade updated", body = GradeView),
        (status = 400, description = "Every field error, with the form to redisplay"),
        (status = 404, description = "Grade not found"),
        (status = 500, description = "Concurrency conflict")
    )
)]
pub async fn update_grade(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonInput(payload): JsonInput<GradeInput>,
) -> AppResult<Json<GradeView>> {
    require_any(&current_user, RECORDERS)?;
    Ok(Json(state.services.grades().update(id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/Grades/Delete/{id}",
    tag = "Grades",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade to delete", body = GradeView),
        (status = 404, description = "Grade not found")
    )
)]
pub async fn confirm_delete(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GradeView>> {
    require_any(&current_user, RECORDERS)?;
    Ok(Json(state.services.grades().get(id).await?))
}

#[utoipa::path(
    post,
    path = "/Grades/Delete/{id}",
    tag = "Grades",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade deleted", body = MessageResponse),
        (status = 404, description = "Grade not found")
    )
)]
pub async fn delete_grade(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_any(&current_user, RECORDERS)?;
    state.services.grades().delete(id).await?;
    Ok(Json(MessageResponse::new("Grade deleted.")))
}

#[utoipa::path(
    get,
    path = "/Grades/ViewOnly",
    tag = "Grades",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All grades, read-only", body = Vec<GradeView>),
        (status = 403, description = "Forbidden - Student only")
    )
)]
pub async fn view_only(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<GradeView>>> {
    require_any(&current_user, &[Role::Student])?;
    Ok(Json(state.services.grades().list().await?))
}
