//! Course catalogue. Codes are unique; courses in use by classes stay.

use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use super::directory::update_conflict;
use crate::domain::{Course, CourseInput};
use crate::errors::{AppError, AppResult, FieldErrors, OptionExt};
use crate::infra::{Repositories, UnitOfWork};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const USED_BY_CLASSES: &str =
    "Course is used by one or more classes. Remove those classes before deletion.";
const CODE_TAKEN: &str = "Course code already exists.";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CourseService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<Course>>;

    async fn get(&self, id: i32) -> AppResult<Course>;

    async fn create(&self, input: CourseInput) -> AppResult<Course>;

    async fn update(&self, id: i32, input: CourseInput) -> AppResult<Course>;

    /// Fails with a referential conflict while classes use the course
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct CourseManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CourseManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

/// Field rules plus code uniqueness.
async fn check_course<C: sea_orm::ConnectionTrait>(
    repos: &Repositories<'_, C>,
    input: &CourseInput,
    except_id: Option<i32>,
) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    if let Err(e) = input.validate() {
        errors.extend_from(&e);
    }
    if !errors.contains("code") && repos.courses().code_taken(&input.code, except_id).await? {
        errors.add("code", CODE_TAKEN);
    }
    if !errors.is_empty() {
        tracing::warn!(fields = ?errors.fields().collect::<Vec<_>>(), "Course rejected");
    }
    errors.into_result()
}

#[async_trait]
impl<U: UnitOfWork> CourseService for CourseManager<U> {
    async fn list(&self) -> AppResult<Vec<Course>> {
        self.uow.repos().courses().list().await
    }

    async fn get(&self, id: i32) -> AppResult<Course> {
        self.uow
            .repos()
            .courses()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Course")
    }

    async fn create(&self, input: CourseInput) -> AppResult<Course> {
        let submitted = input.clone();
        let result = with_transaction!(self.uow, |ctx| {
            check_course(&ctx, &input, None).await?;
            ctx.courses().create(&input).await
        });

        let course = match result {
            Err(e) if e.is_unique_violation() => Err(AppError::invalid_field("code", CODE_TAKEN)),
            other => other,
        }
        .map_err(|e| e.with_form(&submitted))?;

        tracing::info!(course_id = course.id, code = %course.code, "Course created");
        Ok(course)
    }

    async fn update(&self, id: i32, input: CourseInput) -> AppResult<Course> {
        let submitted = input.clone();
        let result = with_transaction!(self.uow, |ctx| {
            let courses = ctx.courses();
            let current = courses.find_by_id(id).await?.ok_or_not_found("Course")?;
            check_course(&ctx, &input, Some(id)).await?;
            match courses.update(&current, &input).await {
                Err(e) if e.is_record_not_updated() => {
                    Err(update_conflict(courses.exists(id).await?, "course", id))
                }
                other => other,
            }
        });

        let course = match result {
            Err(e) if e.is_unique_violation() => Err(AppError::invalid_field("code", CODE_TAKEN)),
            other => other,
        }
        .map_err(|e| e.with_form(&submitted))?;

        tracing::info!(course_id = id, version = course.version, "Course updated");
        Ok(course)
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = with_transaction!(self.uow, |ctx| {
            let courses = ctx.courses();
            if !courses.exists(id).await? {
                return Err(AppError::not_found("Course"));
            }
            if courses.count_classes(id).await? > 0 {
                return Err(AppError::referential(USED_BY_CLASSES));
            }
            courses.delete(id).await
        });

        match result {
            Ok(_) => {
                tracing::info!(course_id = id, "Course deleted");
                Ok(())
            }
            Err(e) if e.is_foreign_key_violation() => {
                tracing::warn!(course_id = id, "Course delete blocked by foreign key");
                Err(AppError::referential(USED_BY_CLASSES))
            }
            Err(e) => Err(e),
        }
    }
}
