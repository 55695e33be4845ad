//! Teacher handlers (Admin).

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::JsonInput;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{Teacher, TeacherInput};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

pub fn teacher_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teachers))
        .route("/Details/:id", get(teacher_details))
        .route("/Create", get(create_form).post(create_teacher))
        .route("/Edit/:id", get(edit_form).post(update_teacher))
        .route("/Delete/:id", get(confirm_delete).post(delete_teacher))
}

#[utoipa::path(
    get,
    path = "/Teachers",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All teachers", body = Vec<Teacher>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_teachers(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Teacher>>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.teachers().list().await?))
}

#[utoipa::path(
    get,
    path = "/Teachers/Details/{id}",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher", body = Teacher),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn teacher_details(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Teacher>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.teachers().get(id).await?))
}

#[utoipa::path(
    get,
    path = "/Teachers/Create",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Empty teacher input", body = TeacherInput))
)]
pub async fn create_form(
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<TeacherInput>> {
    require_admin(&current_user)?;
    Ok(Json(TeacherInput::default()))
}

#[utoipa::path(
    post,
    path = "/Teachers/Create",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    request_body = TeacherInput,
    responses(
        (status = 201, description = "Teacher created", body = Teacher),
        (status = 400, description = "Validation error")
    )
)]
pub async fn create_teacher(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    JsonInput(payload): JsonInput<TeacherInput>,
) -> AppResult<Created<Teacher>> {
    require_admin(&current_user)?;
    Ok(Created(state.services.teachers().create(payload).await?))
}

#[utoipa::path(
    get,
    path = "/Teachers/Edit/{id}",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Current values", body = TeacherInput),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn edit_form(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<TeacherInput>> {
    require_admin(&current_user)?;
    let teacher = state.services.teachers().get(id).await?;
    Ok(Json(TeacherInput::from(&teacher)))
}

#[utoipa::path(
    post,
    path = "/Teachers/Edit/{id}",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Teacher ID")),
    request_body = TeacherInput,
    responses(
        (status = 200, description = "Teacher updated", body = Teacher),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn update_teacher(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonInput(payload): JsonInput<TeacherInput>,
) -> AppResult<Json<Teacher>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.teachers().update(id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/Teachers/Delete/{id}",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher to delete", body = Teacher),
        (status = 404, description = "Teacher not found")
    )
)]
pub async fn confirm_delete(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Teacher>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.teachers().get(id).await?))
}

/// Delete a teacher who has no classes
#[utoipa::path(
    post,
    path = "/Teachers/Delete/{id}",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher deleted", body = MessageResponse),
        (status = 404, description = "Teacher not found"),
        (status = 409, description = "Teacher still has assigned classes")
    )
)]
pub async fn delete_teacher(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&current_user)?;
    state.services.teachers().delete(id).await?;
    Ok(Json(MessageResponse::new("Teacher deleted.")))
}
