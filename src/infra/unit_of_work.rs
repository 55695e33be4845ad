//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and the transaction lifecycle: a workflow
//! either reads through [`UnitOfWork::repos`] or runs its writes inside
//! [`UnitOfWork::transaction`], which commits on `Ok` and rolls back on `Err`.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    IsolationLevel, TransactionTrait,
};

use super::repositories::{
    AttendanceRepository, ClassRepository, CourseRepository, EnrollmentRepository,
    GradeRepository, RoleRepository, StudentRepository, TeacherRepository, UserRepository,
};
use crate::errors::{AppError, AppResult};

/// Boxed future returned by transaction closures.
pub type TxFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Unit of Work trait for dependency injection.
///
/// Not mockable directly because of the generic `transaction` method; mock
/// at the service level or run against SQLite.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Repositories over the shared pool, outside any transaction.
    fn repos(&self) -> Repositories<'_, DatabaseConnection>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success or rolled back on error.
    /// Uses the ReadCommitted isolation level.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send;
}

/// Repository access bound to one connection.
pub struct Repositories<'c, C> {
    conn: &'c C,
}

impl<'c, C> Clone for Repositories<'c, C> {
    fn clone(&self) -> Self {
        Self { conn: self.conn }
    }
}

impl<'c, C> Copy for Repositories<'c, C> {}

impl<'c, C: ConnectionTrait> Repositories<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub fn users(&self) -> UserRepository<'c, C> {
        UserRepository::new(self.conn)
    }

    pub fn roles(&self) -> RoleRepository<'c, C> {
        RoleRepository::new(self.conn)
    }

    pub fn students(&self) -> StudentRepository<'c, C> {
        StudentRepository::new(self.conn)
    }

    pub fn teachers(&self) -> TeacherRepository<'c, C> {
        TeacherRepository::new(self.conn)
    }

    pub fn courses(&self) -> CourseRepository<'c, C> {
        CourseRepository::new(self.conn)
    }

    pub fn classes(&self) -> ClassRepository<'c, C> {
        ClassRepository::new(self.conn)
    }

    pub fn enrollments(&self) -> EnrollmentRepository<'c, C> {
        EnrollmentRepository::new(self.conn)
    }

    pub fn grades(&self) -> GradeRepository<'c, C> {
        GradeRepository::new(self.conn)
    }

    pub fn attendances(&self) -> AttendanceRepository<'c, C> {
        AttendanceRepository::new(self.conn)
    }
}

/// Transaction context providing repository access within a transaction.
///
/// Everything done through it belongs to the same database transaction.
pub type TransactionContext<'a> = Repositories<'a, DatabaseTransaction>;

/// Concrete implementation of UnitOfWork
#[derive(Clone)]
pub struct Persistence {
    db: DatabaseConnection,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn execute_transaction<F, T>(&self, isolation: IsolationLevel, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        // SQLite has no per-transaction isolation settings
        let txn = match self.db.get_database_backend() {
            DbBackend::Sqlite => self.db.begin().await,
            _ => {
                self.db
                    .begin_with_config(Some(isolation), Some(AccessMode::ReadWrite))
                    .await
            }
        }
        .map_err(AppError::from)?;

        let result = f(Repositories::new(&txn)).await;

        match result {
            Ok(value) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn repos(&self) -> Repositories<'_, DatabaseConnection> {
        Repositories::new(&self.db)
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        self.execute_transaction(IsolationLevel::ReadCommitted, f)
            .await
    }
}

/// Run a block inside [`UnitOfWork::transaction`] without spelling out the
/// boxing.
#[macro_export]
macro_rules! with_transaction {
    ($uow:expr, |$ctx:ident| $body:expr) => {
        $uow.transaction(|$ctx| Box::pin(async move { $body })).await
    };
}
