//! Registration, login lockout and role assignment tests.

mod common;

use edusync::domain::{AssignRole, LoginUser, RegisterUser, Role};
use edusync::errors::AppError;
use edusync::infra::UnitOfWork;
use edusync::services::ServiceContainer;

use common::{setup, TestApp};

const PASSWORD: &str = "SecurePass123";

async fn register(app: &TestApp, username: &str) -> uuid::Uuid {
    app.services
        .auth()
        .register(RegisterUser {
            username: username.to_string(),
            email: format!("{}@school.test", username),
            password: PASSWORD.to_string(),
        })
        .await
        .expect("Failed to register")
        .id
}

fn login(username: &str, password: &str) -> LoginUser {
    LoginUser {
        username: username.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_register_grants_student_role() {
    let app = setup().await;

    let user = app
        .services
        .auth()
        .register(RegisterUser {
            username: "jdoe".to_string(),
            email: "jdoe@school.test".to_string(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.roles, vec![Role::Student]);

    let token = app.services.auth().login(login("jdoe", PASSWORD)).await.unwrap();
    let claims = app.services.auth().verify_token(&token.access_token).unwrap();
    assert_eq!(claims.roles, vec!["Student".to_string()]);
}

#[tokio::test]
async fn test_register_reports_weak_password_and_bad_username() {
    let app = setup().await;

    let err = app
        .services
        .auth()
        .register(RegisterUser {
            username: "j doe!".to_string(),
            email: "jdoe@school.test".to_string(),
            password: "short".to_string(),
        })
        .await
        .unwrap_err();

    let errors = err.field_errors().expect("field errors");
    assert!(errors.contains("username"));
    assert!(errors.messages("password").len() >= 2);
}

#[tokio::test]
async fn test_duplicate_username() {
    let app = setup().await;
    register(&app, "jdoe").await;

    let result = app
        .services
        .auth()
        .register(RegisterUser {
            username: "jdoe".to_string(),
            email: "other@school.test".to_string(),
            password: PASSWORD.to_string(),
        })
        .await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_simultaneous_registrations_conflict() {
    let app = setup().await;
    let attempt = |email: &str| RegisterUser {
        username: "twin".to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
    };

    let auth = app.services.auth();
    let (first, second) = tokio::join!(
        auth.register(attempt("one@school.test")),
        auth.register(attempt("two@school.test")),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    let err = outcomes.into_iter().find_map(Result::err).unwrap();
    assert!(matches!(err, AppError::Conflict(ref what) if what == "Username"));
}

#[tokio::test]
async fn test_lockout_after_repeated_failures() {
    let app = setup().await;
    register(&app, "jdoe").await;

    for _ in 0..app.config.lockout_max_failed_attempts {
        let result = app.services.auth().login(login("jdoe", "WrongPass1")).await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    let result = app.services.auth().login(login("jdoe", PASSWORD)).await;
    assert!(matches!(result, Err(AppError::LockedOut)));
}

#[tokio::test]
async fn test_successful_login_resets_failures() {
    let app = setup().await;
    register(&app, "jdoe").await;

    for _ in 0..app.config.lockout_max_failed_attempts - 1 {
        let _ = app.services.auth().login(login("jdoe", "WrongPass1")).await;
    }
    app.services.auth().login(login("jdoe", PASSWORD)).await.unwrap();

    // The counter starts over, so one more failure does not lock
    let _ = app.services.auth().login(login("jdoe", "WrongPass1")).await;
    assert!(app.services.auth().login(login("jdoe", PASSWORD)).await.is_ok());
}

#[tokio::test]
async fn test_unknown_user_login() {
    let app = setup().await;

    let result = app.services.auth().login(login("ghost", PASSWORD)).await;
    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_assign_role_replaces_existing() {
    let app = setup().await;
    let user_id = register(&app, "jdoe").await;

    let updated = app
        .services
        .roles()
        .assign_role(AssignRole {
            user_id: user_id.to_string(),
            selected_role: "Teacher".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(updated.assigned_roles, vec![Role::Teacher]);

    let editor = app.services.roles().edit_roles(user_id).await.unwrap();
    assert_eq!(editor.selected_role, Some(Role::Teacher));
    assert_eq!(editor.available_roles.len(), 3);
}

#[tokio::test]
async fn test_assign_role_rolls_back_when_role_row_missing() {
    let app = setup().await;
    let user_id = register(&app, "jdoe").await;

    let persistence = app.persistence();
    persistence.repos().roles().delete("Teacher").await.unwrap();

    let result = app
        .services
        .roles()
        .assign_role(AssignRole {
            user_id: user_id.to_string(),
            selected_role: "Teacher".to_string(),
        })
        .await;
    assert!(matches!(result, Err(AppError::Internal(_))));

    let roles = persistence.repos().roles().roles_for_user(user_id).await.unwrap();
    assert_eq!(roles, vec![Role::Student]);
}

#[tokio::test]
async fn test_assign_role_input_errors() {
    let app = setup().await;
    let user_id = register(&app, "jdoe").await;

    let blank = app
        .services
        .roles()
        .assign_role(AssignRole {
            user_id: String::new(),
            selected_role: "Admin".to_string(),
        })
        .await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));

    let unknown_role = app
        .services
        .roles()
        .assign_role(AssignRole {
            user_id: user_id.to_string(),
            selected_role: "Janitor".to_string(),
        })
        .await
        .unwrap_err();
    assert!(unknown_role.field_errors().unwrap().contains("selectedRole"));

    let unknown_user = app
        .services
        .roles()
        .assign_role(AssignRole {
            user_id: uuid::Uuid::new_v4().to_string(),
            selected_role: "Admin".to_string(),
        })
        .await;
    assert!(matches!(unknown_user, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_manage_roles_lists_every_user() {
    let app = setup().await;
    register(&app, "alice").await;
    register(&app, "bob").await;

    let users = app.services.roles().manage_roles().await.unwrap();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|u| u.assigned_roles == vec![Role::Student]));
}

#[tokio::test]
async fn test_ensure_admin_is_repeatable() {
    let app = setup().await;

    let first = app
        .services
        .roles()
        .ensure_admin(
            "principal".to_string(),
            "principal@school.test".to_string(),
            PASSWORD.to_string(),
        )
        .await
        .unwrap();
    let second = app
        .services
        .roles()
        .ensure_admin(
            "principal".to_string(),
            "principal@school.test".to_string(),
            PASSWORD.to_string(),
        )
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.roles, vec![Role::Admin]);
    assert!(app.services.roles().seed_roles().await.unwrap().is_empty());
}
