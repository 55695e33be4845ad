//! Attendance handlers. Teachers take attendance; Admins may also delete records.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::JsonInput;
use crate::api::middleware::{require_any, CurrentUser};
use crate::api::AppState;
use crate::domain::{AttendanceForm, AttendanceInput, AttendanceView, Role};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

const RECORDERS: &[Role] = &[Role::Teacher];
const REMOVERS: &[Role] = &[Role::Admin, Role::Teacher];

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendances))
        .route("/Details/:id", get(attendance_details))
        .route("/Create", get(create_form).post(create_attendance))
        .route("/Edit/:id", get(edit_form).post(update_attendance))
        .route("/Delete/:id", get(confirm_delete).post(delete_attendance))
        .route("/ViewOnly", get(view_only))
}

#[utoipa::path(
    get,
    path = "/Attendances",
    tag = "Attendances",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All attendance records", body = Vec<AttendanceView>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_attendances(State(state): State<AppState>) -> AppResult<Json<Vec<AttendanceView>>> {
    Ok(Json(state.services.attendances().list().await?))
}

#[utoipa::path(
    get,
    path = "/Attendances/Details/{id}",
    tag = "Attendances",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Attendance", body = AttendanceView),
        (status = 404, description = "Attendance not found")
    )
)]
pub async fn attendance_details(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AttendanceView>> {
    Ok(Json(state.services.attendances().get(id).await?))
}

/// Blank form with student, class and status options
#[utoipa::path(
    get,
    path = "/Attendances/Create",
    tag = "Attendances",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Create form", body = AttendanceForm),
        (status = 403, description = "Forbidden - Teacher only")
    )
)]
pub async fn create_form(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<AttendanceForm>> {
    require_any(&current_user, RECORDERS)?;
    Ok(Json(state.services.attendances().form(None).await?))
}

/// Record attendance
#[utoipa::path(
    post,
    path = "/Attendances/Create",
    tag = "Attendances",
    security(("bearer_auth" = [])),
    request_body = AttendanceInput,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceView),
        (status = 400, description = "Every field error, with the form to redisplay"),
        (status = 403, description = "Forbidden - Teacher only")
    )
)]
pub async fn create_attendance(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    JsonInput(payload): JsonInput<AttendanceInput>,
) -> AppResult<Created<AttendanceView>> {
    require_any(&current_user, RECORDERS)?;
    Ok(Created(state.services.attendances().create(payload).await?))
}

#[utoipa::path(
    get,
    path = "/Attendances/Edit/{id}",
    tag = "Attendances",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Edit form", body = AttendanceForm),
        (status = 404, description = "Attendance not found")
    )
)]
pub async fn edit_form(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AttendanceForm>> {
    require_any(&current_user, RECORDERS)?;
    Ok(Json(state.services.attendances().form(Some(id)).await?))
}

/// Edit a record; pass the version read to detect concurrent changes
#[utoipa::path(
    post,
    path = "/Attendances/Edit/{id}",
    tag = "Attendances",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Attendance ID")),
    request_body = AttendanceInput,
    responses(
        (status = 200, description = "Attendance updated", body = AttendanceView),
        (status = 400, description = "Every field error, with the form to redisplay"),
        (status = 404, description = "Attendance not found"),
        (status = 500, description = "Concurrency conflict")
    )
)]
pub async fn update_attendance(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonInput(payload): JsonInput<AttendanceInput>,
) -> AppResult<Json<AttendanceView>> {
    require_any(&current_user, RECORDERS)?;
    Ok(Json(state.services.attendances().update(id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/Attendances/Delete/{id}",
    tag = "Attendances",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Attendance to delete", body = AttendanceView),
        (status = 404, description = "Attendance not found")
    )
)]
pub async fn confirm_delete(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AttendanceView>> {
    require_any(&current_user, REMOVERS)?;
    Ok(Json(state.services.attendances().get(id).await?))
}

#[utoipa::path(
    post,
    path = "/Attendances/Delete/{id}",
    tag = "Attendances",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Attendance deleted", body = MessageResponse),
        (status = 404, description = "Attendance not found")
    )
)]
pub async fn delete_attendance(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_any(&current_user, REMOVERS)?;
    state.services.attendances().delete(id).await?;
    Ok(Json(MessageResponse::new("Attendance deleted.")))
}

#[utoipa::path(
    get,
    path = "/Attendances/ViewOnly",
    tag = "Attendances",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All attendance records, read-only", body = Vec<AttendanceView>),
        (status = 403, description = "Forbidden - Student only")
    )
)]
pub async fn view_only(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AttendanceView>>> {
    require_any(&current_user, &[Role::Student])?;
    Ok(Json(state.services.attendances().list().await?))
}
