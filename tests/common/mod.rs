//! Shared fixtures for integration tests: an in-memory SQLite database
//! with migrations applied and roles seeded.

#![allow(dead_code)]

use chrono::NaiveTime;

use edusync::config::Config;
use edusync::domain::{ClassInput, CourseInput, StudentInput, TeacherInput};
use edusync::infra::{Database, Persistence};
use edusync::services::{ServiceContainer, Services};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";

pub struct TestApp {
    pub services: Services,
    pub database: Database,
    pub config: Config,
}

impl TestApp {
    /// Raw repositories over the same connection, for setting up
    /// states the services never produce.
    pub fn persistence(&self) -> Persistence {
        Persistence::new(self.database.get_connection())
    }
}

pub async fn setup() -> TestApp {
    let config = Config::new("sqlite::memory:", TEST_SECRET);
    let database = Database::connect(&config)
        .await
        .expect("Failed to open in-memory database");

    let services = Services::from_connection(database.get_connection(), config.clone());
    services
        .roles()
        .seed_roles()
        .await
        .expect("Failed to seed roles");

    TestApp {
        services,
        database,
        config,
    }
}

pub async fn create_student(app: &TestApp, first_name: &str, last_name: &str) -> i32 {
    app.services
        .students()
        .create(StudentInput {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create student")
        .id
}

pub async fn create_teacher(app: &TestApp, first_name: &str, last_name: &str) -> i32 {
    app.services
        .teachers()
        .create(TeacherInput {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            ..Default::default()
        })
        .await
        .expect("Failed to create teacher")
        .id
}

pub async fn create_course(app: &TestApp, name: &str, code: &str) -> i32 {
    app.services
        .courses()
        .create(CourseInput {
            name: name.to_string(),
            code: code.to_string(),
            credits: 3,
            ..Default::default()
        })
        .await
        .expect("Failed to create course")
        .id
}

/// A Monday 09:00 class of a new course taught by a fresh teacher.
pub async fn create_class(app: &TestApp, course_code: &str) -> i32 {
    let teacher_id = create_teacher(app, "Ada", "Lovelace").await;
    let course_id = create_course(app, "Intro to Programming", course_code).await;
    app.services
        .classes()
        .create(ClassInput {
            teacher_id: Some(teacher_id),
            course_id: Some(course_id),
            time: NaiveTime::from_hms_opt(9, 0, 0),
            day: Some("Monday".to_string()),
            version: None,
        })
        .await
        .expect("Failed to create class")
        .id
}
