//! Grade recording, editing and progress tests.

mod common;

use chrono::{Datelike, Utc};

use edusync::domain::{AssessmentType, GradeInput};
use edusync::errors::AppError;
use edusync::services::ServiceContainer;

use common::{create_class, create_student, setup};

fn grade(student_id: i32, class_id: i32, kind: &str, score: f64) -> GradeInput {
    GradeInput {
        student_id,
        class_id,
        assessment_type: kind.to_string(),
        score: Some(score),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_record_grade() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let before = Utc::now();
    let recorded = app
        .services
        .grades()
        .create(grade(student_id, class_id, "Final", 100.0))
        .await
        .unwrap();

    assert_eq!(recorded.assessment_type, AssessmentType::Final);
    assert_eq!(recorded.score, 100.0);
    assert!(recorded.date_recorded >= before - chrono::Duration::seconds(1));
    assert_eq!(recorded.academic_year, Utc::now().year().to_string());
    assert_eq!(recorded.student_name, "Alice Smith");
    assert_eq!(recorded.course_name.as_deref(), Some("Intro to Programming"));
}

#[tokio::test]
async fn test_score_out_of_range() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let err = app
        .services
        .grades()
        .create(grade(student_id, class_id, "Quiz", 101.0))
        .await
        .unwrap_err();

    let errors = err.field_errors().expect("field errors");
    assert!(errors.contains("score"));
    assert!(app.services.grades().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_academic_year_needs_ascii_digits() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    for year in ["２０２４", "24", "2024a"] {
        let mut input = grade(student_id, class_id, "Quiz", 80.0);
        input.academic_year = Some(year.to_string());
        let err = app.services.grades().create(input).await.unwrap_err();
        assert!(err.field_errors().unwrap().contains("academicYear"), "{year}");
    }

    let mut input = grade(student_id, class_id, "Quiz", 80.0);
    input.academic_year = Some("2023".to_string());
    let recorded = app.services.grades().create(input).await.unwrap();
    assert_eq!(recorded.academic_year, "2023");
}

#[tokio::test]
async fn test_missing_student_and_class_reported_together() {
    let app = setup().await;
    create_class(&app, "CS101").await;

    let err = app
        .services
        .grades()
        .create(grade(9001, 9002, "Midterm", 75.0))
        .await
        .unwrap_err();

    let errors = err.field_errors().expect("field errors");
    assert!(errors.contains("studentId"));
    assert!(errors.contains("classId"));
}

#[tokio::test]
async fn test_unknown_assessment_type() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let err = app
        .services
        .grades()
        .create(grade(student_id, class_id, "Essay", 80.0))
        .await
        .unwrap_err();
    assert!(err.field_errors().unwrap().contains("assessmentType"));
}

#[tokio::test]
async fn test_create_form_needs_students_and_classes() {
    let app = setup().await;

    let result = app.services.grades().form(None).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    create_class(&app, "CS101").await;
    create_student(&app, "Alice", "Smith").await;
    let form = app.services.grades().form(None).await.unwrap();
    assert_eq!(form.students.len(), 1);
    assert_eq!(form.assessment_types.len(), 5);
}

#[tokio::test]
async fn test_edit_keeps_recording_date() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let recorded = app
        .services
        .grades()
        .create(grade(student_id, class_id, "Homework", 60.0))
        .await
        .unwrap();

    let mut edit = grade(student_id, class_id, "Homework", 70.0);
    edit.version = Some(recorded.version);
    let updated = app
        .services
        .grades()
        .update(recorded.id, edit)
        .await
        .unwrap();

    assert_eq!(updated.score, 70.0);
    assert_eq!(updated.date_recorded, recorded.date_recorded);
    assert_eq!(updated.version, recorded.version + 1);
}

#[tokio::test]
async fn test_edit_with_stale_version() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let recorded = app
        .services
        .grades()
        .create(grade(student_id, class_id, "Project", 88.0))
        .await
        .unwrap();

    let mut first = grade(student_id, class_id, "Project", 90.0);
    first.version = Some(recorded.version);
    app.services
        .grades()
        .update(recorded.id, first.clone())
        .await
        .unwrap();

    let err = app
        .services
        .grades()
        .update(recorded.id, first)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ConcurrencyConflict { .. }));
}

#[tokio::test]
async fn test_edit_of_deleted_grade() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    let recorded = app
        .services
        .grades()
        .create(grade(student_id, class_id, "Quiz", 50.0))
        .await
        .unwrap();
    app.services.grades().delete(recorded.id).await.unwrap();

    let result = app
        .services
        .grades()
        .update(recorded.id, grade(student_id, class_id, "Quiz", 55.0))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let again = app.services.grades().delete(recorded.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_academic_progress_lists_student_grades() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let alice = create_student(&app, "Alice", "Smith").await;
    let bob = create_student(&app, "Bob", "Jones").await;

    for (student, kind, score) in [(alice, "Quiz", 80.0), (alice, "Final", 90.0), (bob, "Quiz", 70.0)] {
        app.services
            .grades()
            .create(grade(student, class_id, kind, score))
            .await
            .unwrap();
    }

    let progress = app.services.grades().academic_progress(alice).await.unwrap();
    assert_eq!(progress.student_name, "Alice Smith");
    assert_eq!(progress.grades.len(), 2);
    assert!(progress
        .grades
        .iter()
        .all(|g| g.course_name.as_deref() == Some("Intro to Programming")));

    let missing = app.services.grades().academic_progress(404).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}
