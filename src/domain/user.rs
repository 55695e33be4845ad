//! Identity user entity, roles and related types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::patterns::ALPHANUMERIC;
use super::ParseEnumError;
use crate::config::{ROLE_ADMIN, ROLE_STUDENT, ROLE_TEACHER};

/// Application roles. A user holds zero or one of these in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Teacher, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Teacher => ROLE_TEACHER,
            Role::Student => ROLE_STUDENT,
        }
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_TEACHER => Ok(Role::Teacher),
            ROLE_STUDENT => Ok(Role::Student),
            other => Err(ParseEnumError::new("role", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub access_failed_count: i32,
    pub lockout_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the account is locked at `now`
    pub fn is_locked_out(&self, now: DateTime<Utc>) -> bool {
        self.lockout_end.map_or(false, |end| end > now)
    }
}

/// Registration data
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser {
    /// Letters and digits only
    #[validate(
        length(min = 1, max = 50, message = "Username is required and cannot exceed 50 characters."),
        regex(path = *ALPHANUMERIC, message = "Username can only contain letters and numbers.")
    )]
    #[schema(example = "jdoe")]
    pub username: String,
    #[validate(
        email(message = "Invalid email address."),
        length(max = 100, message = "Email cannot exceed 100 characters.")
    )]
    #[schema(example = "jdoe@example.com")]
    pub email: String,
    /// Strength rules are enforced by [`crate::domain::Password`]
    #[validate(length(max = 100, message = "Password cannot exceed 100 characters."))]
    #[schema(example = "SecurePass123", min_length = 8)]
    pub password: String,
}

/// Login data
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    #[validate(length(min = 1, max = 50, message = "Username is required."))]
    #[schema(example = "jdoe")]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required."))]
    #[schema(example = "SecurePass123")]
    pub password: String,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "jdoe@example.com")]
    pub email: String,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn new(user: User, roles: Vec<Role>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            roles,
            created_at: user.created_at,
        }
    }
}

/// One row of the role management listing
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRoles {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub assigned_roles: Vec<Role>,
    pub available_roles: Vec<Role>,
}

impl UserRoles {
    pub fn new(user: User, assigned_roles: Vec<Role>) -> Self {
        let available_roles = Role::ALL
            .into_iter()
            .filter(|r| !assigned_roles.contains(r))
            .collect();
        Self {
            user_id: user.id,
            username: user.username,
            email: user.email,
            assigned_roles,
            available_roles,
        }
    }
}

/// Role editor payload for one user
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditUserRoles {
    pub user_id: Uuid,
    pub username: String,
    pub selected_role: Option<Role>,
    pub available_roles: Vec<Role>,
}

/// Role reassignment command
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignRole {
    #[serde(default)]
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub user_id: String,
    #[serde(default)]
    #[schema(example = "Teacher")]
    pub selected_role: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            email: "jdoe@example.com".to_string(),
            password_hash: "hashed".to_string(),
            access_failed_count: 0,
            lockout_end: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_round_trips_through_names() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("Janitor".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_available_roles_exclude_assigned() {
        let view = UserRoles::new(user(), vec![Role::Student]);
        assert_eq!(view.available_roles, vec![Role::Admin, Role::Teacher]);
    }

    #[test]
    fn test_lockout_window() {
        let now = Utc::now();
        let mut u = user();
        assert!(!u.is_locked_out(now));

        u.lockout_end = Some(now + Duration::minutes(5));
        assert!(u.is_locked_out(now));

        u.lockout_end = Some(now - Duration::minutes(5));
        assert!(!u.is_locked_out(now));
    }

    #[test]
    fn test_register_validation() {
        let input = RegisterUser {
            username: "bad name!".to_string(),
            email: "not-an-email".to_string(),
            password: "x".repeat(101),
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
