//! End-to-end HTTP tests: real router, real services, in-memory database.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use edusync::api::{create_router, AppState};
use edusync::services::ServiceContainer;

use common::{setup, TestApp};

const PASSWORD: &str = "SecurePass123";

fn router(app: &TestApp) -> Router {
    let state = AppState::from_config(Arc::new(app.database.clone()), app.config.clone());
    create_router(state)
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn login(router: &Router, username: &str) -> String {
    let (status, body) = send(
        router,
        Method::POST,
        "/Account/Login",
        None,
        Some(json!({ "username": username, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["accessToken"].as_str().unwrap().to_string()
}

async fn admin_token(app: &TestApp, router: &Router) -> String {
    app.services
        .roles()
        .ensure_admin(
            "principal".to_string(),
            "principal@school.test".to_string(),
            PASSWORD.to_string(),
        )
        .await
        .unwrap();
    login(router, "principal").await
}

#[tokio::test]
async fn test_register_then_login() {
    let app = setup().await;
    let router = router(&app);

    let (status, body) = send(
        &router,
        Method::POST,
        "/Account/Register",
        None,
        Some(json!({
            "username": "jdoe",
            "email": "jdoe@school.test",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["roles"], json!(["Student"]));

    let token = login(&router, "jdoe").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_register_validation_body() {
    let app = setup().await;
    let router = router(&app);

    let (status, body) = send(
        &router,
        Method::POST,
        "/Account/Register",
        None,
        Some(json!({
            "username": "jdoe",
            "email": "not-an-email",
            "password": "weak",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["fields"]["email"].is_array());
    assert!(body["error"]["fields"]["password"].is_array());
}

#[tokio::test]
async fn test_role_gates() {
    let app = setup().await;
    let router = router(&app);

    let (status, _) = send(&router, Method::GET, "/Students", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    send(
        &router,
        Method::POST,
        "/Account/Register",
        None,
        Some(json!({
            "username": "jdoe",
            "email": "jdoe@school.test",
            "password": PASSWORD,
        })),
    )
    .await;
    let student = login(&router, "jdoe").await;

    let (status, _) = send(&router, Method::GET, "/Students", Some(student.as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&router, Method::GET, "/Students/ViewOnly", Some(student.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&router, Method::GET, "/Account/ManageRoles", Some(student.as_str()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_builds_class_and_enrolls() {
    let app = setup().await;
    let router = router(&app);
    let admin = admin_token(&app, &router).await;

    let (status, teacher) = send(
        &router,
        Method::POST,
        "/Teachers/Create",
        Some(admin.as_str()),
        Some(json!({ "firstName": "Ada", "lastName": "Lovelace" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, course) = send(
        &router,
        Method::POST,
        "/Courses/Create",
        Some(admin.as_str()),
        Some(json!({ "name": "Intro to Programming", "code": "CS101", "credits": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, class) = send(
        &router,
        Method::POST,
        "/Classes/Create",
        Some(admin.as_str()),
        Some(json!({
            "teacherId": teacher["id"],
            "courseId": course["id"],
            "time": "09:00:00",
            "day": "Monday",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", class);

    let (_, student) = send(
        &router,
        Method::POST,
        "/Students/Create",
        Some(admin.as_str()),
        Some(json!({ "firstName": "Alice", "lastName": "Smith" })),
    )
    .await;

    let (status, outcome) = send(
        &router,
        Method::POST,
        "/Classes/EnrollStudent",
        Some(admin.as_str()),
        Some(json!({
            "classId": class["id"],
            "studentId": student["id"],
            "shouldEnroll": true,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["notification"]["level"], "success");
    assert_eq!(outcome["roster"]["students"][0]["isEnrolled"], true);

    let uri = format!("/Teachers/Delete/{}", teacher["id"]);
    let (status, body) = send(&router, Method::POST, &uri, Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "REFERENTIAL_CONFLICT");
}

#[tokio::test]
async fn test_missing_record_is_not_found() {
    let app = setup().await;
    let router = router(&app);
    let admin = admin_token(&app, &router).await;

    let (status, _) = send(&router, Method::GET, "/Courses/Details/404", Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &router,
        Method::GET,
        "/Classes/ManageEnrollments?classId=404",
        Some(admin.as_str()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bad_query_string_uses_error_envelope() {
    let app = setup().await;
    let router = router(&app);
    let admin = admin_token(&app, &router).await;

    for uri in ["/Classes/ManageEnrollments?classId=abc", "/Classes/ManageEnrollments"] {
        let (status, body) = send(&router, Method::GET, uri, Some(admin.as_str()), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "BAD_REQUEST", "{uri}");
    }
}

#[tokio::test]
async fn test_health_and_docs_are_public() {
    let app = setup().await;
    let router = router(&app);

    let (status, body) = send(&router, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"]["status"], "healthy");

    let (status, doc) = send(&router, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/Classes/EnrollStudent"].is_object());
}
