//! Teacher records. A teacher with assigned classes cannot be deleted.

use async_trait::async_trait;
use std::sync::Arc;

use super::directory::update_conflict;
use super::validate_submission;
use crate::domain::{Teacher, TeacherInput};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const ASSIGNED_CLASSES: &str =
    "Teacher has assigned classes. Remove from timetable before deletion.";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TeacherService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Teacher>>;

    async fn get(&self, id: i32) -> AppResult<Teacher>;

    async fn create(&self, input: TeacherInput) -> AppResult<Teacher>;

    async fn update(&self, id: i32, input: TeacherInput) -> AppResult<Teacher>;

    /// Fails with a referential conflict while classes point at the teacher
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct TeacherManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> TeacherManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> TeacherService for TeacherManager<U> {
    async fn list(&self) -> AppResult<Vec<Teacher>> {
        self.uow.repos().teachers().list().await
    }

    async fn get(&self, id: i32) -> AppResult<Teacher> {
        self.uow
            .repos()
            .teachers()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Teacher")
    }

    async fn create(&self, input: TeacherInput) -> AppResult<Teacher> {
        validate_submission(&input, "teacher")?;
        let teacher = with_transaction!(self.uow, |ctx| ctx.teachers().create(&input).await)?;
        tracing::info!(teacher_id = teacher.id, "Teacher created");
        Ok(teacher)
    }

    async fn update(&self, id: i32, input: TeacherInput) -> AppResult<Teacher> {
        validate_submission(&input, "teacher")?;
        let teacher = with_transaction!(self.uow, |ctx| {
            let teachers = ctx.teachers();
            let current = teachers.find_by_id(id).await?.ok_or_not_found("Teacher")?;
            match teachers.update(&current, &input).await {
                Err(e) if e.is_record_not_updated() => {
                    Err(update_conflict(teachers.exists(id).await?, "teacher", id))
                }
                other => other,
            }
        })?;
        tracing::info!(teacher_id = id, version = teacher.version, "Teacher updated");
        Ok(teacher)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = with_transaction!(self.uow, |ctx| {
            let teachers = ctx.teachers();
            if !teachers.exists(id).await? {
                return Err(AppError::not_found("Teacher"));
            }
            if teachers.count_classes(id).await? > 0 {
                return Err(AppError::referential(ASSIGNED_CLASSES));
            }
            teachers.delete(id).await
        });

        match result {
            Ok(_) => {
                tracing::info!(teacher_id = id, "Teacher deleted");
                Ok(())
            }
            Err(e) if e.is_foreign_key_violation() => {
                tracing::warn!(teacher_id = id, "Teacher delete blocked by foreign key");
                Err(AppError::referential(ASSIGNED_CLASSES))
            }
            Err(e @ AppError::ReferentialConflict(_)) => {
                tracing::warn!(teacher_id = id, "Teacher delete blocked by assigned classes");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
