//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    account_handler, attendance_handler, class_handler, course_handler, enrollment_handler,
    grade_handler, student_handler, teacher_handler,
};
use crate::domain::{
    AcademicProgress, AssessmentType, AssignRole, Attendance, AttendanceForm, AttendanceInput,
    AttendanceStatus, AttendanceView, Class, ClassForm, ClassInput, ClassView, Course,
    CourseInput, DayOfWeek, EditUserRoles, Enrollment, EnrollmentForm, EnrollmentInput,
    EnrollmentOutcome, EnrollmentView, Grade, GradeForm, GradeInput, GradeView, LoginUser,
    Notification, NotificationLevel, ProgressEntry, RegisterUser, Role, Roster, RosterEntry,
    SelectOption, SetEnrollment, Student, StudentInput, Teacher, TeacherInput, UserResponse,
    UserRoles,
};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for Edusync
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Edusync",
        version = "0.1.0",
        description = "School management: students, teachers, courses, classes, enrollments, grades and attendance",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Account
        account_handler::register,
        account_handler::login,
        account_handler::manage_roles,
        account_handler::edit_roles,
        account_handler::update_user_roles,
        // Students
        student_handler::list_students,
        student_handler::student_details,
        student_handler::create_form,
        student_handler::create_student,
        student_handler::edit_form,
        student_handler::update_student,
        student_handler::confirm_delete,
        student_handler::delete_student,
        student_handler::view_only,
        student_handler::academic_progress,
        // Teachers
        teacher_handler::list_teachers,
        teacher_handler::teacher_details,
        teacher_handler::create_form,
        teacher_handler::create_teacher,
        teacher_handler::edit_form,
        teacher_handler::update_teacher,
        teacher_handler::confirm_delete,
        teacher_handler::delete_teacher,
        // Courses
        course_handler::list_courses,
        course_handler::course_details,
        course_handler::create_form,
        course_handler::create_course,
        course_handler::edit_form,
        course_handler::update_course,
        course_handler::confirm_delete,
        course_handler::delete_course,
        // Classes
        class_handler::list_classes,
        class_handler::class_details,
        class_handler::create_form,
        class_handler::create_class,
        class_handler::edit_form,
        class_handler::update_class,
        class_handler::confirm_delete,
        class_handler::delete_class,
        class_handler::view_only,
        class_handler::manage_enrollments,
        class_handler::enroll_student,
        // Enrollments
        enrollment_handler::list_enrollments,
        enrollment_handler::enrollment_details,
        enrollment_handler::create_form,
        enrollment_handler::create_enrollment,
        enrollment_handler::edit_form,
        enrollment_handler::update_enrollment,
        enrollment_handler::confirm_delete,
        enrollment_handler::delete_enrollment,
        // Grades
        grade_handler::list_grades,
        grade_handler::grade_details,
        grade_handler::create_form,
        grade_handler::create_grade,
        grade_handler::edit_form,
        grade_handler::update_grade,
        grade_handler::confirm_delete,
        grade_handler::delete_grade,
        grade_handler::view_only,
        // Attendances
        attendance_handler::list_attendances,
        attendance_handler::attendance_details,
        attendance_handler::create_form,
        attendance_handler::create_attendance,
        attendance_handler::edit_form,
        attendance_handler::update_attendance,
        attendance_handler::confirm_delete,
        attendance_handler::delete_attendance,
        attendance_handler::view_only,
    ),
    components(
        schemas(
            // Identity
            Role,
            RegisterUser,
            LoginUser,
            UserResponse,
            UserRoles,
            EditUserRoles,
            AssignRole,
            TokenResponse,
            // School records
            SelectOption,
            Student,
            StudentInput,
            Teacher,
            TeacherInput,
            Course,
            CourseInput,
            DayOfWeek,
            Class,
            ClassView,
            ClassInput,
            ClassForm,
            // Enrollment
            Enrollment,
            EnrollmentView,
            EnrollmentInput,
            EnrollmentForm,
            SetEnrollment,
            Notification,
            NotificationLevel,
            Roster,
            RosterEntry,
            EnrollmentOutcome,
            // Grading
            AssessmentType,
            Grade,
            GradeView,
            GradeInput,
            GradeForm,
            AcademicProgress,
            ProgressEntry,
            // Attendance
            AttendanceStatus,
            Attendance,
            AttendanceView,
            AttendanceInput,
            AttendanceForm,
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Account", description = "Registration, login and role management"),
        (name = "Students", description = "Student records and academic progress"),
        (name = "Teachers", description = "Teacher records"),
        (name = "Courses", description = "Course catalogue"),
        (name = "Classes", description = "Timetable and class rosters"),
        (name = "Enrollments", description = "Enrollment records"),
        (name = "Grades", description = "Assessment scores"),
        (name = "Attendances", description = "Attendance records")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /Account/Login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_workflow_routes() {
        let doc = ApiDoc::openapi();
        for path in [
            "/Account/UpdateUserRoles",
            "/Classes/EnrollStudent",
            "/Grades/Create",
            "/Attendances/ViewOnly",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
