//! HTTP request handlers, one module per resource.

pub mod account_handler;
pub mod attendance_handler;
pub mod class_handler;
pub mod course_handler;
pub mod enrollment_handler;
pub mod grade_handler;
pub mod student_handler;
pub mod teacher_handler;

pub use attendance_handler::attendance_routes;
pub use class_handler::class_routes;
pub use course_handler::course_routes;
pub use enrollment_handler::enrollment_routes;
pub use grade_handler::grade_routes;
pub use student_handler::student_routes;
pub use teacher_handler::teacher_routes;
