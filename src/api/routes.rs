//! Application route configuration.

use axum::{extract::State, http::StatusCode, middleware, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    account_handler, attendance_routes, class_routes, course_routes, enrollment_routes,
    grade_routes, student_routes, teacher_routes,
};
use super::middleware::auth_middleware;
use super::openapi::ApiDoc;
use super::AppState;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    // Every route here needs a bearer token; role gates live in the handlers
    let protected = Router::new()
        .merge(account_handler::role_routes())
        .nest("/Students", student_routes())
        .nest("/Teachers", teacher_routes())
        .nest("/Courses", course_routes())
        .nest("/Classes", class_routes())
        .nest("/Enrollments", enrollment_routes())
        .nest("/Grades", grade_routes())
        .nest("/Attendances", attendance_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(account_handler::public_routes())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Welcome to Edusync"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.database.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: ServiceStatus {
                    status: "healthy",
                    error: None,
                },
            }),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    database: ServiceStatus {
                        status: "unhealthy",
                        error: Some(e.to_string()),
                    },
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header::AUTHORIZATION, Request};
    use chrono::Utc;
    use sea_orm::DatabaseConnection;
    use tower::ServiceExt;
    use uuid::Uuid;
    use crate::AppError;

    use super::*;
    use crate::domain::Course;
    use crate::infra::Database;
    use crate::services::{
        AuthService, Claims, CourseService, MockAuthService, MockCourseService,
        MockServiceContainer,
    };

    fn claims(roles: &[&str]) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: Uuid::new_v4(),
            username: "tester".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: now + 3600,
            iat: now,
        }
    }

    fn app(container: MockServiceContainer) -> Router {
        let database = Arc::new(Database::from_connection(DatabaseConnection::Disconnected));
        create_router(AppState::new(Arc::new(container), database))
    }

    fn container_with_roles(roles: &'static [&'static str]) -> MockServiceContainer {
        let mut auth = MockAuthService::new();
        auth.expect_verify_token().returning(move |token| {
            if token == "valid" {
                Ok(claims(roles))
            } else {
                Err(AppError::Unauthorized)
            }
        });
        let auth: Arc<dyn AuthService> = Arc::new(auth);

        let mut container = MockServiceContainer::new();
        container.expect_auth().returning(move || auth.clone());
        container
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_root_is_public() {
        let response = app(MockServiceContainer::new())
            .oneshot(get("/", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"Welcome to Edusync");
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let response = app(MockServiceContainer::new())
            .oneshot(get("/Students", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_token_is_unauthorized() {
        let response = app(container_with_roles(&["Admin"]))
            .oneshot(get("/Students", Some("forged")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_role_is_forbidden() {
        let response = app(container_with_roles(&["Student"]))
            .oneshot(get("/Teachers", Some("valid")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_lists_courses() {
        let mut courses = MockCourseService::new();
        courses.expect_list().times(1).returning(|| {
            Ok(vec![Course {
                id: 1,
                name: "Intro to Programming".to_string(),
                code: "CS101".to_string(),
                credits: 3,
                version: 1,
            }])
        });
        let courses: Arc<dyn CourseService> = Arc::new(courses);

        let mut container = container_with_roles(&["Admin"]);
        container.expect_courses().returning(move || courses.clone());

        let response = app(container)
            .oneshot(get("/Courses", Some("valid")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json[0]["code"], "CS101");
    }
}
