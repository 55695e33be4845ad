//! Class handlers, including roster management.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::{JsonInput, QueryInput};
use crate::api::middleware::{require_admin, require_any, CurrentUser};
use crate::api::AppState;
use crate::domain::{ClassForm, ClassInput, ClassView, EnrollmentOutcome, Role, Roster, SetEnrollment};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RosterQuery {
    pub class_id: i32,
}

pub fn class_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_classes))
        .route("/Details/:id", get(class_details))
        .route("/Create", get(create_form).post(create_class))
        .route("/Edit/:id", get(edit_form).post(update_class))
        .route("/Delete/:id", get(confirm_delete).post(delete_class))
        .route("/ViewOnly", get(view_only))
        .route("/ManageEnrollments", get(manage_enrollments))
        .route("/EnrollStudent", post(enroll_student))
}

#[utoipa::path(
    get,
    path = "/Classes",
    tag = "Classes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All classes", body = Vec<ClassView>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_classes(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ClassView>>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.classes().list().await?))
}

#[utoipa::path(
    get,
    path = "/Classes/Details/{id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class", body = ClassView),
        (status = 404, description = "Class not found")
    )
)]
pub async fn class_details(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ClassView>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.classes().get(id).await?))
}

/// Blank form with teacher and course options
#[utoipa::path(
    get,
    path = "/Classes/Create",
    tag = "Classes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Create form", body = ClassForm),
        (status = 403, description = "Forbidden - Admin or Teacher only")
    )
)]
pub async fn create_form(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ClassForm>> {
    require_any(&current_user, &[Role::Admin, Role::Teacher])?;
    Ok(Json(state.services.classes().form(None).await?))
}

#[utoipa::path(
    post,
    path = "/Classes/Create",
    tag = "Classes",
    security(("bearer_auth" = [])),
    request_body = ClassInput,
    responses(
        (status = 201, description = "Class created", body = ClassView),
        (status = 400, description = "Validation error, with the form to redisplay"),
        (status = 403, description = "Forbidden - Admin or Teacher only")
    )
)]
pub async fn create_class(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    JsonInput(payload): JsonInput<ClassInput>,
) -> AppResult<Created<ClassView>> {
    require_any(&current_user, &[Role::Admin, Role::Teacher])?;
    Ok(Created(state.services.classes().create(payload).await?))
}

#[utoipa::path(
    get,
    path = "/Classes/Edit/{id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Edit form", body = ClassForm),
        (status = 404, description = "Class not found")
    )
)]
pub async fn edit_form(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ClassForm>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.classes().form(Some(id)).await?))
}

#[utoipa::path(
    post,
    path = "/Classes/Edit/{id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Class ID")),
    request_body = ClassInput,
    responses(
        (status = 200, description = "Class updated", body = ClassView),
        (status = 400, description = "Validation error, with the form to redisplay"),
        (status = 404, description = "Class not found")
    )
)]
pub async fn update_class(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonInput(payload): JsonInput<ClassInput>,
) -> AppResult<Json<ClassView>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.classes().update(id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/Classes/Delete/{id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class to delete", body = ClassView),
        (status = 404, description = "Class not found")
    )
)]
pub async fn confirm_delete(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ClassView>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.classes().get(id).await?))
}

/// Delete a class with its enrollments, grades and attendance
#[utoipa::path(
    post,
    path = "/Classes/Delete/{id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 404, description = "Class not found")
    )
)]
pub async fn delete_class(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&current_user)?;
    state.services.classes().delete(id).await?;
    Ok(Json(MessageResponse::new("Class deleted.")))
}

/// Timetable for every role
#[utoipa::path(
    get,
    path = "/Classes/ViewOnly",
    tag = "Classes",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "All classes", body = Vec<ClassView>))
)]
pub async fn view_only(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ClassView>>> {
    require_any(&current_user, &Role::ALL)?;
    Ok(Json(state.services.classes().list().await?))
}

/// Roster of a class: every student flagged by membership
#[utoipa::path(
    get,
    path = "/Classes/ManageEnrollments",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(RosterQuery),
    responses(
        (status = 200, description = "Class roster", body = Roster),
        (status = 400, description = "Missing or non-numeric classId"),
        (status = 404, description = "Class not found")
    )
)]
pub async fn manage_enrollments(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    QueryInput(query): QueryInput<RosterQuery>,
) -> AppResult<Json<Roster>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.enrollments().roster(query.class_id).await?))
}

/// Enroll or unenroll a student, returning the refreshed roster
#[utoipa::path(
    post,
    path = "/Classes/EnrollStudent",
    tag = "Classes",
    security(("bearer_auth" = [])),
    request_body = SetEnrollment,
    responses(
        (status = 200, description = "Notification and roster", body = EnrollmentOutcome),
        (status = 404, description = "Class or student not found")
    )
)]
pub async fn enroll_student(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    JsonInput(payload): JsonInput<SetEnrollment>,
) -> AppResult<Json<EnrollmentOutcome>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.enrollments().set_enrollment(payload).await?))
}
