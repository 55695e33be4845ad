//! Repository layer - Data access abstraction
//!
//! One repository per aggregate, each borrowing a connection: the pool for
//! plain reads, or the open transaction inside a unit of work.

mod attendance_repository;
mod base;
mod class_repository;
mod course_repository;
mod enrollment_repository;
pub(crate) mod entities;
mod grade_repository;
mod role_repository;
mod student_repository;
mod teacher_repository;
mod user_repository;

pub use attendance_repository::{AttendanceFields, AttendanceRepository};
pub use base::Versioned;
pub use class_repository::{ClassFields, ClassRepository};
pub use course_repository::CourseRepository;
pub use enrollment_repository::EnrollmentRepository;
pub use grade_repository::{GradeFields, GradeRepository};
pub use role_repository::{RoleRecord, RoleRepository};
pub use student_repository::StudentRepository;
pub use teacher_repository::TeacherRepository;
pub use user_repository::UserRepository;
