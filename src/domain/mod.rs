//! Domain layer - Core business entities and logic
//!
//! School records, identity types and the inputs the workflows accept.
//! Nothing here touches the database.

pub mod attendance;
pub mod class;
pub mod course;
pub mod enrollment;
pub mod grade;
pub mod password;
pub mod patterns;
pub mod student;
pub mod teacher;
pub mod user;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub use attendance::{Attendance, AttendanceForm, AttendanceInput, AttendanceStatus, AttendanceView};
pub use class::{Class, ClassForm, ClassInput, ClassView, DayOfWeek};
pub use course::{Course, CourseInput};
pub use enrollment::{
    Enrollment, EnrollmentForm, EnrollmentInput, EnrollmentOutcome, EnrollmentView, Notification,
    NotificationLevel, Roster, RosterEntry, SetEnrollment,
};
pub use grade::{AcademicProgress, AssessmentType, Grade, GradeForm, GradeInput, GradeView, ProgressEntry};
pub use password::Password;
pub use student::{Student, StudentInput};
pub use teacher::{Teacher, TeacherInput};
pub use user::{
    AssignRole, EditUserRoles, LoginUser, RegisterUser, Role, User, UserResponse, UserRoles,
};

/// A string did not name a variant of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Dropdown entry: an id and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SelectOption {
    pub id: i32,
    #[schema(example = "CS101 - Intro to Programming")]
    pub label: String,
}

impl SelectOption {
    pub fn new(id: i32, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// "First Last"
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name, last_name)
}
