//! Account handlers: registration, login and role management.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::{JsonInput, QueryInput, ValidatedJson};
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{AssignRole, EditUserRoles, LoginUser, RegisterUser, UserResponse, UserRoles};
use crate::errors::{AppError, AppResult};
use crate::services::TokenResponse;
use crate::types::Created;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EditRolesQuery {
    /// Identity user id
    pub user_id: String,
}

/// Routes open to anonymous callers
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/Account/Register", post(register))
        .route("/Account/Login", post(login))
}

/// Role management routes (Admin)
pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/Account/ManageRoles", get(manage_roles))
        .route("/Account/EditRoles", get(edit_roles))
        .route("/Account/UpdateUserRoles", post(update_user_roles))
}

/// Register a new account holding the Student role
#[utoipa::path(
    post,
    path = "/Account/Register",
    tag = "Account",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonInput(payload): JsonInput<RegisterUser>,
) -> AppResult<Created<UserResponse>> {
    let user = state.services.auth().register(payload).await?;
    Ok(Created(user))
}

/// Login and get JWT token
#[utoipa::path(
    post,
    path = "/Account/Login",
    tag = "Account",
    request_body = LoginUser,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid login attempt"),
        (status = 423, description = "Account locked out")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginUser>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.services.auth().login(payload).await?;
    Ok(Json(token))
}

/// List every user with assigned and available roles
#[utoipa::path(
    get,
    path = "/Account/ManageRoles",
    tag = "Account",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Users and their roles", body = Vec<UserRoles>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only")
    )
)]
pub async fn manage_roles(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserRoles>>> {
    require_admin(&current_user)?;
    Ok(Json(state.services.roles().manage_roles().await?))
}

/// Role editor for one user
#[utoipa::path(
    get,
    path = "/Account/EditRoles",
    tag = "Account",
    security(("bearer_auth" = [])),
    params(EditRolesQuery),
    responses(
        (status = 200, description = "Current role and choices", body = EditUserRoles),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found")
    )
)]
pub async fn edit_roles(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    QueryInput(query): QueryInput<EditRolesQuery>,
) -> AppResult<Json<EditUserRoles>> {
    require_admin(&current_user)?;
    let user_id = Uuid::parse_str(query.user_id.trim()).map_err(|_| AppError::not_found("User"))?;
    Ok(Json(state.services.roles().edit_roles(user_id).await?))
}

/// Replace a user's roles with exactly the selected one
#[utoipa::path(
    post,
    path = "/Account/UpdateUserRoles",
    tag = "Account",
    security(("bearer_auth" = [])),
    request_body = AssignRole,
    responses(
        (status = 200, description = "Role assigned", body = UserRoles),
        (status = 400, description = "Invalid input or unknown role"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin only"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Role change rolled back")
    )
)]
pub async fn update_user_roles(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    JsonInput(payload): JsonInput<AssignRole>,
) -> AppResult<Json<UserRoles>> {
    require_admin(&current_user)?;
    let updated = state.services.roles().assign_role(payload).await?;
    tracing::info!(
        admin_id = %current_user.id,
        user_id = %updated.user_id,
        roles = ?updated.assigned_roles,
        "User roles updated"
    );
    Ok(Json(updated))
}
