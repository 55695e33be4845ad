//! Enrollment record handlers (Admin).

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};

use crate::api::extractors::JsonInput;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{EnrollmentForm, EnrollmentInput, EnrollmentView};
use crate::errors::AppResult;
use crate::types::{Created, MessageResponse};

pub fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_enrollments))
        .route("/Details/:id", get(enrollment_details))
        .route("/Create", get(create_form).post(create_enrollment))
        .route("/Edit/:id", get(edit_form).post(update_enrollment))
        .route("/Delete/:id", get(confirm_delete).post(delete_enrollment))
}

#[utoipa::path(
    get,
    path = "/Enrollments",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All enrollments", body = Vec<EnrollmentView>),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn list_enrollments(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EnrollmentView>>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.enrollments().list().await?))
}

#[utoipa::path(
    get,
    path = "/Enrollments/Details/{id}",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment", body = EnrollmentView),
        (status = 404, description = "Enrollment not found")
    )
)]
pub async fn enrollment_details(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<EnrollmentView>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.enrollments().get(id).await?))
}

#[utoipa::path(
    get,
    path = "/Enrollments/Create",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Create form", body = EnrollmentForm))
)]
pub async fn create_form(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<EnrollmentForm>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.enrollments().form(None).await?))
}

#[utoipa::path(
    post,
    path = "/Enrollments/Create",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    request_body = EnrollmentInput,
    responses(
        (status = 201, description = "Enrollment created", body = EnrollmentView),
        (status = 400, description = "Validation error or duplicate pair")
    )
)]
pub async fn create_enrollment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    JsonInput(payload): JsonInput<EnrollmentInput>,
) -> AppResult<Created<EnrollmentView>> {
    require_admin(&current_user)?;
    Ok(Created(state.services.enrollments().create(payload).await?))
}

#[utoipa::path(
    get,
    path = "/Enrollments/Edit/{id}",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Edit form", body = EnrollmentForm),
        (status = 404, description = "Enrollment not found")
    )
)]
pub async fn edit_form(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<EnrollmentForm>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.enrollments().form(Some(id)).await?))
}

#[utoipa::path(
    post,
    path = "/Enrollments/Edit/{id}",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Enrollment ID")),
    request_body = EnrollmentInput,
    responses(
        (status = 200, description = "Enrollment updated", body = EnrollmentView),
        (status = 400, description = "Validation error or duplicate pair"),
        (status = 404, description = "Enrollment not found")
    )
)]
pub async fn update_enrollment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    JsonInput(payload): JsonInput<EnrollmentInput>,
) -> AppResult<Json<EnrollmentView>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.enrollments().update(id, payload).await?))
}

#[utoipa::path(
    get,
    path = "/Enrollments/Delete/{id}",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment to delete", body = EnrollmentView),
        (status = 404, description = "Enrollment not found")
    )
)]
pub async fn confirm_delete(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<EnrollmentView>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.enrollments().get(id).await?))
}

#[utoipa::path(
    post,
    path = "/Enrollments/Delete/{id}",
    tag = "Enrollments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment deleted", body = MessageResponse),
        (status = 404, description = "Enrollment not found")
    )
)]
pub async fn delete_enrollment(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&current_user)?;
    state.services.enrollments().delete(id).await?;
    Ok(Json(MessageResponse::new("Enrollment deleted.")))
}
