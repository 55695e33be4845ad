//! JWT authentication middleware and role gates.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::Role;
use crate::errors::AppError;

/// Authenticated user extracted from JWT token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<Role>,
}

impl CurrentUser {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// JWT authentication middleware.
///
/// Extracts and validates the JWT token from the Authorization header,
/// then injects the CurrentUser into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.services.auth().verify_token(token)?;

    // Role names unknown to this build are ignored
    let roles = claims
        .roles
        .iter()
        .filter_map(|r| r.parse::<Role>().ok())
        .collect();

    let current_user = CurrentUser {
        id: claims.sub,
        username: claims.username,
        roles,
    };

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require at least one of `roles`, otherwise Forbidden.
pub fn require_any(user: &CurrentUser, roles: &[Role]) -> Result<(), AppError> {
    if roles.iter().any(|r| user.has_role(*r)) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, required = ?roles, "Role check failed");
        Err(AppError::Forbidden)
    }
}

/// Require the Admin role.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    require_any(user, &[Role::Admin])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: Vec<Role>) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            roles,
        }
    }

    #[test]
    fn test_require_any() {
        let teacher = user(vec![Role::Teacher]);
        assert!(require_any(&teacher, &[Role::Admin, Role::Teacher]).is_ok());
        assert!(matches!(require_admin(&teacher), Err(AppError::Forbidden)));

        let nobody = user(vec![]);
        assert!(require_any(&nobody, &Role::ALL).is_err());
    }
}
