//! Student records.

use async_trait::async_trait;
use std::sync::Arc;

use super::directory::update_conflict;
use super::validate_submission;
use crate::domain::{Student, StudentInput};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StudentService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Student>>;

    async fn get(&self, id: i32) -> AppResult<Student>;

    async fn create(&self, input: StudentInput) -> AppResult<Student>;

    async fn update(&self, id: i32, input: StudentInput) -> AppResult<Student>;

    /// Delete a student along with their enrollments, grades and attendance
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct StudentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> StudentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> StudentService for StudentManager<U> {
    async fn list(&self) -> AppResult<Vec<Student>> {
        self.uow.repos().students().list().await
    }

    async fn get(&self, id: i32) -> AppResult<Student> {
        self.uow
            .repos()
            .students()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Student")
    }

    async fn create(&self, input: StudentInput) -> AppResult<Student> {
        validate_submission(&input, "student")?;
        let student = with_transaction!(self.uow, |ctx| ctx.students().create(&input).await)?;
        tracing::info!(student_id = student.id, "Student created");
        Ok(student)
    }

    async fn update(&self, id: i32, input: StudentInput) -> AppResult<Student> {
        validate_submission(&input, "student")?;
        let student = with_transaction!(self.uow, |ctx| {
            let students = ctx.students();
            let current = students.find_by_id(id).await?.ok_or_not_found("Student")?;
            match students.update(&current, &input).await {
                Err(e) if e.is_record_not_updated() => {
                    Err(update_conflict(students.exists(id).await?, "student", id))
                }
                other => other,
            }
        })?;
        tracing::info!(student_id = id, version = student.version, "Student updated");
        Ok(student)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let deleted = with_transaction!(self.uow, |ctx| ctx.students().delete(id).await)?;
        if !deleted {
            return Err(AppError::not_found("Student"));
        }
        tracing::info!(student_id = id, "Student deleted");
        Ok(())
    }
}
