//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Invalid login attempt")]
    InvalidCredentials,

    #[error("Your account is locked out. Please try again later.")]
    LockedOut,

    // Resource errors
    #[error("{0}")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    /// Delete blocked by dependent rows.
    #[error("{0}")]
    ReferentialConflict(String),

    /// Update matched no row although the row still exists.
    #[error("Concurrency conflict on {entity} {id}")]
    ConcurrencyConflict { entity: &'static str, id: i32 },

    // Validation
    #[error("Validation failed")]
    Validation(Box<ValidationFailure>),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] DbErr),

    #[error("Authentication error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Per-field validation messages keyed by the camelCase field name.
///
/// Form-level messages use the empty key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a message to a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Merge errors reported by `validator` derive rules.
    pub fn extend_from(&mut self, errors: &validator::ValidationErrors) {
        for (field, errs) in errors.field_errors() {
            let field = camel_case(&field.to_string());
            for e in errs.iter() {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                self.add(field.clone(), message);
            }
        }
    }

    /// Fail with a `Validation` error when any message was recorded.
    pub fn into_result(self) -> AppResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(Box::new(ValidationFailure::new(self))))
        }
    }
}

impl From<&validator::ValidationErrors> for FieldErrors {
    fn from(errors: &validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        fields.extend_from(errors);
        fields
    }
}

fn camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper = false;
    for ch in snake.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Rejected submission: field errors plus what the caller needs to redisplay
/// the form (the original input and freshly rebuilt option lists).
#[derive(Debug, Clone, Serialize)]
pub struct ValidationFailure {
    pub errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<serde_json::Value>,
}

impl ValidationFailure {
    pub fn new(errors: FieldErrors) -> Self {
        Self { errors, form: None }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    form: Option<serde_json::Value>,
}

impl AppError {
    /// Get error code for client
    fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::LockedOut => "LOCKED_OUT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::ReferentialConflict(_) => "REFERENTIAL_CONFLICT",
            AppError::ConcurrencyConflict { .. } => "CONCURRENCY_CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidCredentials | AppError::Jwt(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::LockedOut => StatusCode::LOCKED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::ReferentialConflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::ConcurrencyConflict { .. }
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::NotFound(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::ReferentialConflict(msg) => msg.clone(),
            AppError::Conflict(msg) => format!("{} already exists", msg),

            // Hide details for internal/security errors
            AppError::ConcurrencyConflict { entity, id } => {
                tracing::error!(entity, id, "Unexpected concurrency conflict");
                "The record was modified by another request".to_string()
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                msg.clone()
            }

            // Use default message for others
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();
        let message = self.user_message();
        let (fields, form) = match self {
            AppError::Validation(failure) => {
                let failure = *failure;
                (Some(failure.errors), failure.form)
            }
            _ => (None, None),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message,
                fields,
                form,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self, what: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, what: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::not_found(what))
    }
}

/// Convenience constructors
impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{} not found.", what))
    }

    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn referential(msg: impl Into<String>) -> Self {
        AppError::ReferentialConflict(msg.into())
    }

    /// Single field-level validation error.
    pub fn invalid_field(field: &str, msg: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, msg);
        AppError::Validation(Box::new(ValidationFailure::new(errors)))
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Attach redisplay state to a validation failure; other errors pass through.
    pub fn with_form<F: Serialize>(self, form: &F) -> Self {
        match self {
            AppError::Validation(mut failure) => {
                failure.form = serde_json::to_value(form).ok();
                AppError::Validation(failure)
            }
            other => other,
        }
    }

    /// Field errors carried by a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            AppError::Validation(failure) => Some(&failure.errors),
            _ => None,
        }
    }

    /// Whether the store rejected a write because of a foreign key.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            AppError::Database(e) if matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
        )
    }

    /// Whether the store rejected a write because of a unique index.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            AppError::Database(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        )
    }

    /// Whether an update matched no row.
    pub fn is_record_not_updated(&self) -> bool {
        matches!(self, AppError::Database(DbErr::RecordNotUpdated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_field_names() {
        assert_eq!(camel_case("student_id"), "studentId");
        assert_eq!(camel_case("academic_year"), "academicYear");
        assert_eq!(camel_case("score"), "score");
    }

    #[test]
    fn test_field_errors_collect_multiple_fields() {
        let mut errors = FieldErrors::new();
        errors.add("studentId", "Student does not exist.");
        errors.add("classId", "Class does not exist.");

        assert!(errors.contains("studentId"));
        assert!(errors.contains("classId"));
        assert_eq!(errors.messages("classId"), ["Class does not exist."]);

        let err = errors.into_result().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.field_errors().unwrap().fields().count(), 2);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::not_found("Grade").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::referential("Teacher has assigned classes.").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ConcurrencyConflict { entity: "grade", id: 1 }.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(AppError::LockedOut.status(), StatusCode::LOCKED);
    }

    #[test]
    fn test_with_form_only_touches_validation() {
        let err = AppError::invalid_field("score", "Score must be between 0 and 100.")
            .with_form(&serde_json::json!({ "score": 101 }));
        match err {
            AppError::Validation(failure) => assert!(failure.form.is_some()),
            other => panic!("unexpected {:?}", other),
        }

        let err = AppError::not_found("Grade").with_form(&serde_json::json!({}));
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
