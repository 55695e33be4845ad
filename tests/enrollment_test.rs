//! Enrollment workflow tests against an in-memory database.

mod common;

use edusync::domain::{EnrollmentInput, NotificationLevel, SetEnrollment};
use edusync::errors::AppError;
use edusync::services::ServiceContainer;

use common::{create_class, create_student, setup};

fn toggle(class_id: i32, student_id: i32, should_enroll: bool) -> SetEnrollment {
    SetEnrollment {
        class_id,
        student_id,
        should_enroll,
    }
}

#[tokio::test]
async fn test_roster_flags_enrolled_students() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let alice = create_student(&app, "Alice", "Smith").await;
    let bob = create_student(&app, "Bob", "Jones").await;

    let roster = app.services.enrollments().roster(class_id).await.unwrap();
    assert_eq!(roster.students.len(), 2);
    assert!(roster.enrolled_ids().is_empty());
    assert_eq!(roster.class.course_label.as_deref(), Some("CS101 - Intro to Programming"));
    assert_eq!(roster.class.teacher_name.as_deref(), Some("Ada Lovelace"));

    app.services
        .enrollments()
        .set_enrollment(toggle(class_id, alice, true))
        .await
        .unwrap();

    let roster = app.services.enrollments().roster(class_id).await.unwrap();
    assert_eq!(roster.enrolled_ids(), vec![alice]);
    assert!(roster
        .students
        .iter()
        .any(|s| s.student_id == bob && !s.is_enrolled));
}

#[tokio::test]
async fn test_roster_of_missing_class() {
    let app = setup().await;

    let result = app.services.enrollments().roster(404).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_enroll_is_idempotent() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let first = app
        .services
        .enrollments()
        .set_enrollment(toggle(class_id, student_id, true))
        .await
        .unwrap();
    assert_eq!(first.notification.level, NotificationLevel::Success);
    assert_eq!(first.notification.message, "Student Enrolled Successfully");

    let second = app
        .services
        .enrollments()
        .set_enrollment(toggle(class_id, student_id, true))
        .await
        .unwrap();
    assert_eq!(second.notification.level, NotificationLevel::Info);
    assert_eq!(second.roster.enrolled_ids(), vec![student_id]);

    let all = app.services.enrollments().list().await.unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn test_unenroll_is_idempotent() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    app.services
        .enrollments()
        .set_enrollment(toggle(class_id, student_id, true))
        .await
        .unwrap();

    let removed = app
        .services
        .enrollments()
        .set_enrollment(toggle(class_id, student_id, false))
        .await
        .unwrap();
    assert_eq!(removed.notification.level, NotificationLevel::Warning);
    assert_eq!(removed.notification.message, "Student Unenrolled Successfully");
    assert!(removed.roster.enrolled_ids().is_empty());

    let again = app
        .services
        .enrollments()
        .set_enrollment(toggle(class_id, student_id, false))
        .await
        .unwrap();
    assert_eq!(again.notification.level, NotificationLevel::Info);
    assert!(app.services.enrollments().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_enroll_into_missing_class() {
    let app = setup().await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let result = app
        .services
        .enrollments()
        .set_enrollment(toggle(999, student_id, true))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_duplicate_enrollment_form_is_rejected() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let input = EnrollmentInput {
        student_id,
        class_id,
        grade: Some("A".to_string()),
        version: None,
    };
    let created = app.services.enrollments().create(input.clone()).await.unwrap();
    assert_eq!(created.student_name, "Alice Smith");

    let err = app.services.enrollments().create(input).await.unwrap_err();
    let errors = err.field_errors().expect("field errors");
    assert!(errors.contains("studentId"));
}

#[tokio::test]
async fn test_enrollment_grade_length() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let err = app
        .services
        .enrollments()
        .create(EnrollmentInput {
            student_id,
            class_id,
            grade: Some("A+++".to_string()),
            version: None,
        })
        .await
        .unwrap_err();
    assert!(err.field_errors().unwrap().contains("grade"));
}
