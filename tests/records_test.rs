//! Student, teacher, course and class record tests.

mod common;

use chrono::{NaiveDate, NaiveTime};

use edusync::domain::{
    AttendanceInput, ClassInput, CourseInput, GradeInput, SetEnrollment, StudentInput,
    TeacherInput,
};
use edusync::errors::AppError;
use edusync::services::ServiceContainer;

use common::{create_class, create_course, create_student, create_teacher, setup};

#[tokio::test]
async fn test_teacher_with_classes_cannot_be_deleted() {
    let app = setup().await;
    create_class(&app, "CS101").await;
    let teacher_id = app.services.teachers().list().await.unwrap()[0].id;

    let result = app.services.teachers().delete(teacher_id).await;
    match result {
        Err(AppError::ReferentialConflict(msg)) => assert!(msg.contains("assigned classes")),
        other => panic!("expected referential conflict, got {:?}", other),
    }
    assert!(app.services.teachers().get(teacher_id).await.is_ok());
}

#[tokio::test]
async fn test_teacher_without_classes_is_deleted() {
    let app = setup().await;
    let teacher_id = create_teacher(&app, "Grace", "Hopper").await;

    app.services.teachers().delete(teacher_id).await.unwrap();
    let result = app.services.teachers().get(teacher_id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_teacher_name_required() {
    let app = setup().await;

    let err = app
        .services
        .teachers()
        .create(TeacherInput {
            first_name: String::new(),
            last_name: "Hopper".to_string(),
            version: None,
        })
        .await
        .unwrap_err();
    let errors = err.field_errors().expect("field errors");
    assert!(errors.contains("firstName"));
    assert!(!errors.contains("lastName"));
}

#[tokio::test]
async fn test_course_code_is_unique() {
    let app = setup().await;
    create_course(&app, "Intro to Programming", "CS101").await;

    let err = app
        .services
        .courses()
        .create(CourseInput {
            name: "Another".to_string(),
            code: "CS101".to_string(),
            credits: 4,
            version: None,
        })
        .await
        .unwrap_err();
    assert!(err.field_errors().unwrap().contains("code"));
}

#[tokio::test]
async fn test_course_credits_bounds() {
    let app = setup().await;

    let err = app
        .services
        .courses()
        .create(CourseInput {
            name: "Thesis".to_string(),
            code: "TH900".to_string(),
            credits: 11,
            version: None,
        })
        .await
        .unwrap_err();
    assert!(err.field_errors().unwrap().contains("credits"));
}

#[tokio::test]
async fn test_course_used_by_class_cannot_be_deleted() {
    let app = setup().await;
    create_class(&app, "CS101").await;
    let course_id = app.services.courses().list().await.unwrap()[0].id;

    let result = app.services.courses().delete(course_id).await;
    assert!(matches!(result, Err(AppError::ReferentialConflict(_))));
}

#[tokio::test]
async fn test_class_rejects_unknown_references() {
    let app = setup().await;

    let err = app
        .services
        .classes()
        .create(ClassInput {
            teacher_id: Some(77),
            course_id: Some(78),
            time: NaiveTime::from_hms_opt(10, 30, 0),
            day: Some("Funday".to_string()),
            version: None,
        })
        .await
        .unwrap_err();

    let errors = err.field_errors().expect("field errors");
    assert!(errors.contains("teacherId"));
    assert!(errors.contains("courseId"));
    assert!(errors.contains("day"));
}

#[tokio::test]
async fn test_class_views_carry_labels() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;

    let view = app.services.classes().get(class_id).await.unwrap();
    assert_eq!(view.teacher_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(view.course_label.as_deref(), Some("CS101 - Intro to Programming"));

    let form = app.services.classes().form(Some(class_id)).await.unwrap();
    assert_eq!(form.teachers.len(), 1);
    assert_eq!(form.courses.len(), 1);
    assert_eq!(form.input.day.as_deref(), Some("Monday"));
}

#[tokio::test]
async fn test_student_update_uses_version() {
    let app = setup().await;
    let id = create_student(&app, "Alice", "Smith").await;
    let student = app.services.students().get(id).await.unwrap();

    let edit = StudentInput {
        first_name: "Alicia".to_string(),
        last_name: "Smith".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(2010, 5, 17),
        version: Some(student.version),
    };
    let updated = app.services.students().update(id, edit.clone()).await.unwrap();
    assert_eq!(updated.first_name, "Alicia");

    let stale = app.services.students().update(id, edit).await;
    assert!(matches!(stale, Err(AppError::ConcurrencyConflict { .. })));
}

#[tokio::test]
async fn test_student_delete_removes_dependent_records() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let student_id = create_student(&app, "Alice", "Smith").await;
    let other_id = create_student(&app, "Bob", "Jones").await;

    for student in [student_id, other_id] {
        app.services
            .enrollments()
            .set_enrollment(SetEnrollment {
                class_id,
                student_id: student,
                should_enroll: true,
            })
            .await
            .unwrap();
        app.services
            .attendances()
            .create(AttendanceInput {
                student_id: student,
                class_id,
                date: NaiveDate::from_ymd_opt(2024, 9, 2),
                status: "Present".to_string(),
                version: None,
            })
            .await
            .unwrap();
    }
    app.services
        .grades()
        .create(GradeInput {
            student_id,
            class_id,
            assessment_type: "Quiz".to_string(),
            score: Some(90.0),
            ..Default::default()
        })
        .await
        .unwrap();

    app.services.students().delete(student_id).await.unwrap();

    let attendance = app.services.attendances().list().await.unwrap();
    assert_eq!(attendance.len(), 1);
    assert_eq!(attendance[0].student_id, other_id);
    assert!(app.services.grades().list().await.unwrap().is_empty());

    let roster = app.services.enrollments().roster(class_id).await.unwrap();
    assert_eq!(roster.enrolled_ids(), vec![other_id]);

    let again = app.services.students().delete(student_id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_class_delete_removes_dependent_records() {
    let app = setup().await;
    let class_id = create_class(&app, "CS101").await;
    let kept_class = create_class(&app, "CS102").await;
    let student_id = create_student(&app, "Alice", "Smith").await;

    for class in [class_id, kept_class] {
        app.services
            .enrollments()
            .set_enrollment(SetEnrollment {
                class_id: class,
                student_id,
                should_enroll: true,
            })
            .await
            .unwrap();
        app.services
            .attendances()
            .create(AttendanceInput {
                student_id,
                class_id: class,
                date: NaiveDate::from_ymd_opt(2024, 9, 2),
                status: "Late".to_string(),
                version: None,
            })
            .await
            .unwrap();
    }
    app.services
        .grades()
        .create(GradeInput {
            student_id,
            class_id,
            assessment_type: "Midterm".to_string(),
            score: Some(72.5),
            ..Default::default()
        })
        .await
        .unwrap();

    app.services.classes().delete(class_id).await.unwrap();

    let attendance = app.services.attendances().list().await.unwrap();
    assert_eq!(attendance.len(), 1);
    assert_eq!(attendance[0].class_id, kept_class);
    assert!(app.services.grades().list().await.unwrap().is_empty());

    let enrollments = app.services.enrollments().list().await.unwrap();
    assert_eq!(enrollments.len(), 1);
    assert_eq!(enrollments[0].class_id, kept_class);
    assert!(matches!(
        app.services.enrollments().roster(class_id).await,
        Err(AppError::NotFound(_))
    ));

    let again = app.services.classes().delete(class_id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}
