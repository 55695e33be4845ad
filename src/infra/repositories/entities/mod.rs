//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod attendance;
pub mod class;
pub mod course;
pub mod enrollment;
pub mod grade;
pub mod role;
pub mod student;
pub mod teacher;
pub mod user;
pub mod user_role;

use crate::domain::ParseEnumError;
use crate::errors::AppError;

/// A stored enumeration value no longer parses.
pub(crate) fn corrupt(table: &str, id: impl std::fmt::Display, err: ParseEnumError) -> AppError {
    AppError::internal(format!("Invalid {} in {} row {}: {}", err.kind, table, id, err.value))
}
