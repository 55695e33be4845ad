//! Authentication service - registration, login with lockout, tokens.
//!
//! Password hashing lives in the domain `Password` value object.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::{Config, DEFAULT_ROLE, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{LoginUser, Password, RegisterUser, Role, User, UserResponse};
use crate::errors::{AppError, AppResult, FieldErrors};
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account holding the default role
    async fn register(&self, input: RegisterUser) -> AppResult<UserResponse>;

    /// Check credentials and issue a token
    async fn login(&self, input: LoginUser) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate JWT token for a user
fn generate_token(user: &User, roles: &[Role], config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    /// Name the column an insert collided on.
    async fn duplicate_account(&self, username: &str, email: &str) -> AppResult<AppError> {
        let users = self.uow.repos().users();
        if users.find_by_username(username).await?.is_some() {
            return Ok(AppError::conflict("Username"));
        }
        if users.find_by_email(email).await?.is_some() {
            return Ok(AppError::conflict("Email"));
        }
        Ok(AppError::conflict("Account"))
    }

    /// Count a failed attempt, locking the account once the limit is hit.
    async fn record_failure(&self, user: &User) -> AppResult<()> {
        let failures = user.access_failed_count + 1;
        let repos = self.uow.repos();
        if failures >= self.config.lockout_max_failed_attempts {
            let until = Utc::now() + Duration::minutes(self.config.lockout_minutes);
            tracing::warn!(user_id = %user.id, until = %until, "Account locked out");
            repos.users().set_lockout_state(user.id, 0, Some(until)).await
        } else {
            repos
                .users()
                .set_lockout_state(user.id, failures, user.lockout_end)
                .await
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, input: RegisterUser) -> AppResult<UserResponse> {
        let mut errors = FieldErrors::new();
        if let Err(e) = input.validate() {
            errors.extend_from(&e);
        }
        for message in Password::strength_violations(&input.password) {
            errors.add("password", message);
        }
        errors.into_result()?;

        let password_hash = Password::new(&input.password)?.into_string();
        let RegisterUser {
            username, email, ..
        } = input;
        let (taken_username, taken_email) = (username.clone(), email.clone());

        let result = with_transaction!(self.uow, |ctx| {
            let users = ctx.users();
            if users.find_by_username(&username).await?.is_some() {
                return Err(AppError::conflict("Username"));
            }
            if users.find_by_email(&email).await?.is_some() {
                return Err(AppError::conflict("Email"));
            }

            let user = users.create(username, email, password_hash).await?;
            let role = ctx
                .roles()
                .find_by_name(DEFAULT_ROLE)
                .await?
                .ok_or_else(|| AppError::internal("Default role is not seeded."))?;
            ctx.roles().add_to_user(user.id, role.id).await?;
            Ok(user)
        });

        // A concurrent registration can commit between the checks and the insert
        let user = match result {
            Err(e) if e.is_unique_violation() => {
                tracing::warn!(username = %taken_username, "Registration lost a uniqueness race");
                return Err(self.duplicate_account(&taken_username, &taken_email).await?);
            }
            other => other?,
        };

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(UserResponse::new(user, vec![Role::Student]))
    }

    async fn login(&self, input: LoginUser) -> AppResult<TokenResponse> {
        let repos = self.uow.repos();
        let user = repos.users().find_by_username(&input.username).await?;

        // Verify against a dummy hash for unknown users so timing does not
        // reveal which usernames exist.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let Some(user) = user else {
            Password::from_hash(dummy_hash.to_string()).verify(&input.password);
            tracing::warn!(username = %input.username, "Login for unknown user");
            return Err(AppError::InvalidCredentials);
        };

        if user.is_locked_out(Utc::now()) {
            tracing::warn!(user_id = %user.id, "Login attempt on locked account");
            return Err(AppError::LockedOut);
        }

        if !Password::from_hash(user.password_hash.clone()).verify(&input.password) {
            self.record_failure(&user).await?;
            return Err(AppError::InvalidCredentials);
        }

        if user.access_failed_count > 0 || user.lockout_end.is_some() {
            repos.users().set_lockout_state(user.id, 0, None).await?;
        }

        let roles = repos.roles().roles_for_user(user.id).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        generate_token(&user, &roles, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }
}
