//! Class timetable: scheduled offerings of a course by a teacher.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::ConnectionTrait;

use super::container::parallel;
use super::directory::{class_views, update_conflict};
use crate::domain::{Class, ClassForm, ClassInput, ClassView, Course, Teacher};
use crate::errors::{AppError, AppResult, FieldErrors, OptionExt};
use crate::infra::repositories::ClassFields;
use crate::infra::{Repositories, UnitOfWork};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ClassService: Send + Sync {
    /// Every class with course label and teacher name
    async fn list(&self) -> AppResult<Vec<ClassView>>;

    async fn get(&self, id: i32) -> AppResult<ClassView>;

    /// Create form (no id) or edit form, with teacher and course options
    async fn form(&self, id: Option<i32>) -> AppResult<ClassForm>;

    async fn create(&self, input: ClassInput) -> AppResult<ClassView>;

    async fn update(&self, id: i32, input: ClassInput) -> AppResult<ClassView>;

    /// Delete a class along with its enrollments, grades and attendance
    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct ClassManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ClassManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn lookups(&self) -> AppResult<(HashMap<i32, Teacher>, HashMap<i32, Course>)> {
        let repos = self.uow.repos();
        let (teachers, courses) =
            parallel::join2(repos.teachers().list(), repos.courses().list()).await?;
        Ok((
            teachers.into_iter().map(|t| (t.id, t)).collect(),
            courses.into_iter().map(|c| (c.id, c)).collect(),
        ))
    }

    async fn view(&self, class: Class) -> AppResult<ClassView> {
        let (teachers, courses) = self.lookups().await?;
        class_views(vec![class], &teachers, &courses)
            .into_iter()
            .next()
            .ok_or_else(|| AppError::internal("Class view missing"))
    }

    async fn form_with(&self, input: ClassInput) -> AppResult<ClassForm> {
        let repos = self.uow.repos();
        let (teachers, courses) =
            parallel::join2(repos.teachers().list(), repos.courses().list()).await?;
        Ok(ClassForm {
            input,
            teachers: teachers.iter().map(Teacher::option).collect(),
            courses: courses.iter().map(Course::option).collect(),
        })
    }

    /// Attach a freshly built form to a validation failure.
    async fn redisplay(&self, err: AppError, input: ClassInput) -> AppError {
        if !matches!(err, AppError::Validation(_)) {
            return err;
        }
        match self.form_with(input).await {
            Ok(form) => err.with_form(&form),
            Err(e) => e,
        }
    }
}

/// Referenced rows must exist and the day must be a weekday name.
async fn check_class<C: ConnectionTrait>(
    repos: &Repositories<'_, C>,
    input: &ClassInput,
) -> AppResult<ClassFields> {
    let mut errors = FieldErrors::new();
    if let Some(teacher_id) = input.teacher_id {
        if !repos.teachers().exists(teacher_id).await? {
            errors.add("teacherId", "Selected teacher does not exist.");
        }
    }
    if let Some(course_id) = input.course_id {
        if !repos.courses().exists(course_id).await? {
            errors.add("courseId", "Selected course does not exist.");
        }
    }
    let day = input.parse_day(&mut errors);

    if !errors.is_empty() {
        tracing::warn!(fields = ?errors.fields().collect::<Vec<_>>(), "Class rejected");
    }
    errors.into_result()?;

    Ok(ClassFields {
        teacher_id: input.teacher_id,
        course_id: input.course_id,
        time: input.time,
        day,
    })
}

#[async_trait]
impl<U: UnitOfWork> ClassService for ClassManager<U> {
    async fn list(&self) -> AppResult<Vec<ClassView>> {
        let repos = self.uow.repos();
        let classes = repos.classes().list().await?;
        let (teachers, courses) = self.lookups().await?;
        Ok(class_views(classes, &teachers, &courses))
    }

    async fn get(&self, id: i32) -> AppResult<ClassView> {
        let class = self
            .uow
            .repos()
            .classes()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Class")?;
        self.view(class).await
    }

    async fn form(&self, id: Option<i32>) -> AppResult<ClassForm> {
        let input = match id {
            Some(id) => {
                let class = self
                    .uow
                    .repos()
                    .classes()
                    .find_by_id(id)
                    .await?
                    .ok_or_not_found("Class")?;
                ClassInput::from(&class)
            }
            None => ClassInput::default(),
        };
        self.form_with(input).await
    }

    async fn create(&self, input: ClassInput) -> AppResult<ClassView> {
        let submitted = input.clone();
        let result = with_transaction!(self.uow, |ctx| {
            let fields = check_class(&ctx, &input).await?;
            ctx.classes().create(fields).await
        });

        let class = match result {
            Ok(class) => class,
            Err(e) => return Err(self.redisplay(e, submitted).await),
        };
        tracing::info!(class_id = class.id, "Class created");
        self.view(class).await
    }

    async fn update(&self, id: i32, input: ClassInput) -> AppResult<ClassView> {
        let submitted = input.clone();
        let result = with_transaction!(self.uow, |ctx| {
            let classes = ctx.classes();
            let current = classes.find_by_id(id).await?.ok_or_not_found("Class")?;
            let fields = check_class(&ctx, &input).await?;
            match classes.update(&current, fields, input.version).await {
                Err(e) if e.is_record_not_updated() => {
                    Err(update_conflict(classes.exists(id).await?, "class", id))
                }
                other => other,
            }
        });

        let class = match result {
            Ok(class) => class,
            Err(e) => return Err(self.redisplay(e, submitted).await),
        };
        tracing::info!(class_id = id, version = class.version, "Class updated");
        self.view(class).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let deleted = with_transaction!(self.uow, |ctx| ctx.classes().delete(id).await)?;
        if !deleted {
            tracing::warn!(class_id = id, "Class not found for delete");
            return Err(AppError::not_found("Class"));
        }
        tracing::info!(class_id = id, "Class deleted");
        Ok(())
    }
}
