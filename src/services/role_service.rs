//! Role management: listing, editing and atomically reassigning roles.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{AssignRole, EditUserRoles, Password, Role, UserResponse, UserRoles};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleService: Send + Sync {
    /// Every user with assigned and still available roles
    async fn manage_roles(&self) -> AppResult<Vec<UserRoles>>;

    /// Role editor for one user
    async fn edit_roles(&self, user_id: Uuid) -> AppResult<EditUserRoles>;

    /// Replace all of a user's roles with exactly one, atomically
    async fn assign_role(&self, input: AssignRole) -> AppResult<UserRoles>;

    /// Create any missing role rows; returns the names created
    async fn seed_roles(&self) -> AppResult<Vec<String>>;

    /// Create an Admin account, or promote the existing user with that name
    async fn ensure_admin(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AppResult<UserResponse>;
}

pub struct RoleManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RoleManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn replace_roles(&self, user_id: Uuid, role: Role) -> AppResult<()> {
        with_transaction!(self.uow, |ctx| {
            let removed = ctx.roles().remove_all_for_user(user_id).await.map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Error removing existing roles");
                AppError::internal("Error removing existing roles.")
            })?;
            tracing::debug!(user_id = %user_id, removed, "Existing roles removed");

            let record = match ctx.roles().find_by_name(role.as_str()).await {
                Ok(Some(record)) => record,
                Ok(None) => {
                    tracing::error!(user_id = %user_id, role = %role, "Role row missing");
                    return Err(AppError::internal("Error assigning role."));
                }
                Err(e) => {
                    tracing::error!(user_id = %user_id, error = %e, "Error looking up role");
                    return Err(AppError::internal("Error assigning role."));
                }
            };

            ctx.roles().add_to_user(user_id, record.id).await.map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Error assigning role");
                AppError::internal("Error assigning role.")
            })
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> RoleService for RoleManager<U> {
    async fn manage_roles(&self) -> AppResult<Vec<UserRoles>> {
        let repos = self.uow.repos();
        let users = repos.users().list().await?;
        let mut assigned = repos.roles().roles_by_user().await?;

        Ok(users
            .into_iter()
            .map(|user| {
                let roles = assigned.remove(&user.id).unwrap_or_default();
                UserRoles::new(user, roles)
            })
            .collect())
    }

    async fn edit_roles(&self, user_id: Uuid) -> AppResult<EditUserRoles> {
        let repos = self.uow.repos();
        let user = repos.users().find_by_id(user_id).await?.ok_or_not_found("User")?;
        let roles = repos.roles().roles_for_user(user_id).await?;

        Ok(EditUserRoles {
            user_id: user.id,
            username: user.username,
            selected_role: roles.first().copied(),
            available_roles: Role::ALL.to_vec(),
        })
    }

    async fn assign_role(&self, input: AssignRole) -> AppResult<UserRoles> {
        let user_id = input.user_id.trim();
        let selected = input.selected_role.trim();
        if user_id.is_empty() || selected.is_empty() {
            tracing::warn!("Role assignment with blank input");
            return Err(AppError::bad_request("Invalid input."));
        }

        let role: Role = selected.parse().map_err(|_| {
            tracing::warn!(role = selected, "Unknown role requested");
            AppError::invalid_field("selectedRole", "Invalid role selected.")
        })?;

        // Ids that do not parse cannot name an existing user.
        let user_id = Uuid::parse_str(user_id).map_err(|_| AppError::not_found("User"))?;

        let repos = self.uow.repos();
        let user = repos.users().find_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "Role assignment for unknown user");
            AppError::not_found("User")
        })?;

        self.replace_roles(user_id, role).await?;
        tracing::info!(user_id = %user_id, role = %role, "Role assigned");

        let roles = self.uow.repos().roles().roles_for_user(user_id).await?;
        Ok(UserRoles::new(user, roles))
    }

    async fn seed_roles(&self) -> AppResult<Vec<String>> {
        let created = with_transaction!(self.uow, |ctx| {
            let mut created = Vec::new();
            for role in Role::ALL {
                let (_, was_created) = ctx.roles().ensure(role.as_str()).await?;
                if was_created {
                    created.push(role.to_string());
                }
            }
            Ok(created)
        })?;

        if !created.is_empty() {
            tracing::info!(roles = ?created, "Roles seeded");
        }
        Ok(created)
    }

    async fn ensure_admin(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> AppResult<UserResponse> {
        let existing = self.uow.repos().users().find_by_username(&username).await?;
        let user = match existing {
            Some(user) => user,
            None => {
                let password_hash = Password::new(&password)?.into_string();
                with_transaction!(self.uow, |ctx| {
                    ctx.users().create(username, email, password_hash).await
                })?
            }
        };

        self.replace_roles(user.id, Role::Admin).await?;
        tracing::info!(user_id = %user.id, "Admin account ready");
        Ok(UserResponse::new(user, vec![Role::Admin]))
    }
}
