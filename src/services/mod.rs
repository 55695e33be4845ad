//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. Handlers depend on the service traits; the
//! `*Manager` implementations run every mutation as one unit of work.

mod attendance_service;
mod auth_service;
mod class_service;
pub mod container;
mod course_service;
mod directory;
mod enrollment_service;
mod grade_service;
mod role_service;
mod student_service;
mod teacher_service;

use serde::Serialize;
use validator::Validate;

use crate::errors::{AppResult, FieldErrors};

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use attendance_service::{AttendanceManager, AttendanceService};
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use class_service::{ClassManager, ClassService};
pub use course_service::{CourseManager, CourseService};
pub use enrollment_service::{EnrollmentManager, EnrollmentService};
pub use grade_service::{GradeManager, GradeService};
pub use role_service::{RoleManager, RoleService};
pub use student_service::{StudentManager, StudentService};
pub use teacher_service::{TeacherManager, TeacherService};

pub use container::parallel;

#[cfg(any(test, feature = "test-utils"))]
pub use attendance_service::MockAttendanceService;
#[cfg(any(test, feature = "test-utils"))]
pub use auth_service::MockAuthService;
#[cfg(any(test, feature = "test-utils"))]
pub use class_service::MockClassService;
#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use course_service::MockCourseService;
#[cfg(any(test, feature = "test-utils"))]
pub use enrollment_service::MockEnrollmentService;
#[cfg(any(test, feature = "test-utils"))]
pub use grade_service::MockGradeService;
#[cfg(any(test, feature = "test-utils"))]
pub use role_service::MockRoleService;
#[cfg(any(test, feature = "test-utils"))]
pub use student_service::MockStudentService;
#[cfg(any(test, feature = "test-utils"))]
pub use teacher_service::MockTeacherService;

/// Run the derive rules of a submission, returning every field error with
/// the submission attached for redisplay.
pub(crate) fn validate_submission<T: Validate + Serialize>(input: &T, entity: &str) -> AppResult<()> {
    let Err(e) = input.validate() else {
        return Ok(());
    };
    let errors = FieldErrors::from(&e);
    tracing::warn!(entity, fields = ?errors.fields().collect::<Vec<_>>(), "Submission rejected");
    errors.into_result().map_err(|err| err.with_form(input))
}
