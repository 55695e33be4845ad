//! Student handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::extractors::{JsonInput, QueryInput};
use crate::api::middleware::{require_admin, require_any, CurrentUser};
use crate::api::AppState;
use crate::domain::{AcademicProgress, Role, Student, StudentInput};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProgressQuery {
    pub student_id: i32,
}

pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students))
        .route("/Details/:id", get(student_details))
        .route("/Create", get(create_form).post(create_student))
        .route("/Edit/:id", get(edit_form).post(update_student))
        .route("/Delete/:id", get(confirm_delete).post(delete_student))
        .route("/ViewOnly", get(view_only))
        .route("/AcademicProgress", get(academic_progress))
}

/// List all students
#[utoipa::path(
    get,
    path = "/Students",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All students", body = Vec<Student>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_students(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Student>>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.students().list().await?))
}

#[utoipa::path(
    get,
    path = "/Students/Details/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn student_details(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Student>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.students().get(id).await?))
}

/// Blank create form
#[utoipa::path(
    get,
    path = "/Students/Create",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Empty student input", body = StudentInput))
)]
pub async fn create_form(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<StudentInput>> {
    require_admin(&current_user)?;
    Ok(Json(StudentInput::default()))
}

#[utoipa::path(
    post,
    path = "/Students/Create",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = StudentInput,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_student(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    JsonInput(payload): JsonInput<StudentInput>,
) -> AppResult<Created<Student>> {
    require_admin(&current_user)?;
    Ok(Created(state.services.students().create(payload).await?))
}

/// Edit form prefilled with the stored student
#[utoipa::path(
    get,
    path = "/Students/Edit/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Current values", body = StudentInput),
        (status = 404, description = "Student not found")
    )
)]
pub async fn edit_form(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<StudentInput>> {
    require_admin(&current_user)?;
    let student = state.services.students().get(id).await?;
    Ok(Json(StudentInput::from(&student)))
}

#[utoipa::path(
    post,
    path = "/Students/Edit/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Student ID")),
    request_body = StudentInput,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonInput(payload): JsonInput<StudentInput>,
) -> AppResult<Json<Student>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.students().update(id, payload).await?))
}

/// Student about to be deleted
#[utoipa::path(
    get,
    path = "/Students/Delete/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student to delete", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn confirm_delete(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Student>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.students().get(id).await?))
}

/// Delete a student with their enrollments, grades and attendance
#[utoipa::path(
    post,
    path = "/Students/Delete/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&current_user)?;
    state.services.students().delete(id).await?;
    Ok(Json(MessageResponse::new("Student deleted.")))
}

/// Read-only student list for teachers and students
#[utoipa::path(
    get,
    path = "/Students/ViewOnly",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All students", body = Vec<Student>),
        (status = 403, description = "Forbidden - Student or Teacher only")
    )
)]
pub async fn view_only(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Student>>> {
    require_any(&current_user, &[Role::Student, Role::Teacher])?;
    Ok(Json(state.services.students().list().await?))
}

/// Every grade of one student
#[utoipa::path(
    get,
    path = "/Students/AcademicProgress",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(ProgressQuery),
    responses(
        (status = 200, description = "Grades of the student", body = AcademicProgress),
        (status = 404, description = "Student not found")
    )
)]
pub async fn academic_progress(
    State(state): State<AppState>,
    QueryInput(query): QueryInput<ProgressQuery>,
) -> AppResult<Json<AcademicProgress>> {
    Ok(Json(
        state.services.grades().academic_progress(query.student_id).await?,
    ))
}
