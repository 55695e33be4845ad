//! Service Container - Centralized service access.
//!
//! Handlers reach every workflow through [`ServiceContainer`], so router
//! tests can swap the whole set for mocks.

use std::future::Future;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AttendanceManager, AttendanceService, AuthService, Authenticator, ClassManager,
    ClassService, CourseManager, CourseService, EnrollmentManager, EnrollmentService,
    GradeManager, GradeService, RoleManager, RoleService, StudentManager, StudentService,
    TeacherManager, TeacherService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn roles(&self) -> Arc<dyn RoleService>;

    fn students(&self) -> Arc<dyn StudentService>;

    fn teachers(&self) -> Arc<dyn TeacherService>;

    fn courses(&self) -> Arc<dyn CourseService>;

    fn classes(&self) -> Arc<dyn ClassService>;

    fn enrollments(&self) -> Arc<dyn EnrollmentService>;

    fn grades(&self) -> Arc<dyn GradeService>;

    fn attendances(&self) -> Arc<dyn AttendanceService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth: Arc<dyn AuthService>,
    roles: Arc<dyn RoleService>,
    students: Arc<dyn StudentService>,
    teachers: Arc<dyn TeacherService>,
    courses: Arc<dyn CourseService>,
    classes: Arc<dyn ClassService>,
    enrollments: Arc<dyn EnrollmentService>,
    grades: Arc<dyn GradeService>,
    attendances: Arc<dyn AttendanceService>,
}

impl Services {
    /// Build every service over one shared unit of work
    pub fn from_connection(db: DatabaseConnection, config: Config) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth: Arc::new(Authenticator::new(uow.clone(), config)),
            roles: Arc::new(RoleManager::new(uow.clone())),
            students: Arc::new(StudentManager::new(uow.clone())),
            teachers: Arc::new(TeacherManager::new(uow.clone())),
            courses: Arc::new(CourseManager::new(uow.clone())),
            classes: Arc::new(ClassManager::new(uow.clone())),
            enrollments: Arc::new(EnrollmentManager::new(uow.clone())),
            grades: Arc::new(GradeManager::new(uow.clone())),
            attendances: Arc::new(AttendanceManager::new(uow)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth.clone()
    }

    fn roles(&self) -> Arc<dyn RoleService> {
        self.roles.clone()
    }

    fn students(&self) -> Arc<dyn StudentService> {
        self.students.clone()
    }

    fn teachers(&self) -> Arc<dyn TeacherService> {
        self.teachers.clone()
    }

    fn courses(&self) -> Arc<dyn CourseService> {
        self.courses.clone()
    }

    fn classes(&self) -> Arc<dyn ClassService> {
        self.classes.clone()
    }

    fn enrollments(&self) -> Arc<dyn EnrollmentService> {
        self.enrollments.clone()
    }

    fn grades(&self) -> Arc<dyn GradeService> {
        self.grades.clone()
    }

    fn attendances(&self) -> Arc<dyn AttendanceService> {
        self.attendances.clone()
    }
}

/// Run independent lookups concurrently.
///
/// Workflows use these to load the tables a view needs in one round of
/// store queries instead of one after another.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// If either operation fails, the error is returned immediately.
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }

    /// Execute four independent async operations in parallel.
    pub async fn join4<F1, F2, F3, F4, T1, T2, T3, T4>(
        f1: F1,
        f2: F2,
        f3: F3,
        f4: F4,
    ) -> AppResult<(T1, T2, T3, T4)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
        F3: Future<Output = AppResult<T3>>,
        F4: Future<Output = AppResult<T4>>,
    {
        try_join!(f1, f2, f3, f4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<&'static str> {
            Ok("two")
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "two");
    }

    #[tokio::test]
    async fn test_parallel_join4_fails_fast() {
        let result = parallel::join4(
            async { Ok::<_, AppError>(1) },
            async { Err::<i32, _>(AppError::not_found("Class")) },
            async { Ok::<_, AppError>(3) },
            async { Ok::<_, AppError>(4) },
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
