//! Attendance recording, editing and deletion tests.

mod common;

use chrono::NaiveDate;

use edusync::domain::{AttendanceInput, AttendanceStatus};
use edusync::errors::AppError;
use edusync::services::ServiceContainer;

use common::{create_class, create_student, setup};

fn attendance(student_id: i32, class_id: i32, status: &str) -> AttendanceInput {
    AttendanceInput {
        student_id,
        class_id,
        date: NaiveDate::from_ymd_opt(2024, 9, 2),
        status: status.to_string(),
        version: None,
    }
}

#[tokio::test]
async fn test_attendance_status_must_be_known() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let err = app
        .services
        .attendances()
        .create(attendance(student_id, class_id, "Maybe"))
        .await
        .unwrap_err();
    assert!(err.field_errors().unwrap().contains("status"));

    let recorded = app
        .services
        .attendances()
        .create(attendance(student_id, class_id, "Present"))
        .await
        .unwrap();
    assert_eq!(recorded.status, AttendanceStatus::Present);
    assert_eq!(recorded.class_label, "CS101 - Intro to Programming");
}

#[tokio::test]
async fn test_attendance_date_is_required() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let mut input = attendance(student_id, class_id, "Late");
    input.date = None;
    let err = app.services.attendances().create(input).await.unwrap_err();
    assert!(err.field_errors().unwrap().contains("date"));
}

#[tokio::test]
async fn test_attendance_defaults_to_absent() {
    let input = AttendanceInput::default();
    assert_eq!(input.status, "Absent");
}

#[tokio::test]
async fn test_missing_student_and_class_reported_together() {
    let app = setup().await;
    create_class(&app, "CS101").await;

    let err = app
        .services
        .attendances()
        .create(attendance(9001, 9002, "Present"))
        .await
        .unwrap_err();

    let errors = err.field_errors().expect("field errors");
    assert!(errors.contains("studentId"));
    assert!(errors.contains("classId"));
    assert!(app.services.attendances().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_with_stale_version() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let recorded = app
        .services
        .attendances()
        .create(attendance(student_id, class_id, "Absent"))
        .await
        .unwrap();

    let mut first = attendance(student_id, class_id, "Late");
    first.version = Some(recorded.version);
    let updated = app
        .services
        .attendances()
        .update(recorded.id, first.clone())
        .await
        .unwrap();
    assert_eq!(updated.status, AttendanceStatus::Late);
    assert_ne!(updated.version, recorded.version);

    let err = app
        .services
        .attendances()
        .update(recorded.id, first)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConcurrencyConflict { .. }));

    let kept = app.services.attendances().get(recorded.id).await.unwrap();
    assert_eq!(kept.version, updated.version);
}

#[tokio::test]
async fn test_edit_of_deleted_attendance() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let recorded = app
        .services
        .attendances()
        .create(attendance(student_id, class_id, "Present"))
        .await
        .unwrap();
    app.services.attendances().delete(recorded.id).await.unwrap();

    let result = app
        .services
        .attendances()
        .update(recorded.id, attendance(student_id, class_id, "Excused"))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_delete_attendance() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let recorded = app
        .services
        .attendances()
        .create(attendance(student_id, class_id, "Present"))
        .await
        .unwrap();

    app.services.attendances().delete(recorded.id).await.unwrap();
    assert!(matches!(
        app.services.attendances().get(recorded.id).await,
        Err(AppError::NotFound(_))
    ));

    let again = app.services.attendances().delete(recorded.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}
