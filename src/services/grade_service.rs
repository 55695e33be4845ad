//! Grading workflow: scored assessments of a student within a class.
//!
//! Create and edit collect every failure (format rules, closed assessment
//! types and the existence of the referenced student and class) before
//! reporting, and rejected submissions come back with the option lists
//! needed to redisplay the form.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use sea_orm::ConnectionTrait;

use super::container::parallel;
use super::directory::{check_student_and_class, update_conflict, Directory};
use crate::domain::{
    AcademicProgress, AssessmentType, Grade, GradeForm, GradeInput, GradeView, ProgressEntry,
};
use crate::errors::{AppError, AppResult, FieldErrors, OptionExt};
use crate::infra::repositories::GradeFields;
use crate::infra::{Repositories, UnitOfWork};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const NOTHING_TO_GRADE: &str = "No Students or Classes available to create a grade!";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait GradeService: Send + Sync {
    async fn list(&self) -> AppResult<Vec<GradeView>>;

    async fn get(&self, id: i32) -> AppResult<GradeView>;

    /// Create form (no id) or edit form. The create form is refused while
    /// there are no students or no classes.
    async fn form(&self, id: Option<i32>) -> AppResult<GradeForm>;

    /// Record a grade stamped with the current time
    async fn create(&self, input: GradeInput) -> AppResult<GradeView>;

    /// Edit a grade, keeping its recording date
    async fn update(&self, id: i32, input: GradeInput) -> AppResult<GradeView>;

    async fn delete(&self, id: i32) -> AppResult<()>;

    /// Every grade of one student, most recent first
    async fn academic_progress(&self, student_id: i32) -> AppResult<AcademicProgress>;
}

pub struct GradeManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> GradeManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn view(&self, grade: Grade) -> AppResult<GradeView> {
        let directory = Directory::load(self.uow.repos()).await?;
        Ok(grade_view(grade, &directory))
    }

    async fn redisplay(&self, err: AppError, input: GradeInput) -> AppError {
        if !matches!(err, AppError::Validation(_)) {
            return err;
        }
        match Directory::load(self.uow.repos()).await {
            Ok(directory) => err.with_form(&grade_form(input, &directory)),
            Err(e) => e,
        }
    }
}

fn grade_view(grade: Grade, directory: &Directory) -> GradeView {
    GradeView {
        student_name: directory.student_name(grade.student_id),
        class_label: directory.class_label(grade.class_id),
        course_name: directory.course_name(grade.class_id),
        id: grade.id,
        student_id: grade.student_id,
        class_id: grade.class_id,
        assessment_type: grade.assessment_type,
        score: grade.score,
        date_recorded: grade.date_recorded,
        academic_year: grade.academic_year,
        version: grade.version,
    }
}

fn grade_form(input: GradeInput, directory: &Directory) -> GradeForm {
    GradeForm {
        input,
        students: directory.student_options(),
        classes: directory.class_options(),
        assessment_types: AssessmentType::ALL.to_vec(),
    }
}

async fn check_grade<C: ConnectionTrait>(
    repos: &Repositories<'_, C>,
    input: &GradeInput,
    now: DateTime<Utc>,
) -> AppResult<GradeFields> {
    let mut errors = FieldErrors::new();
    let assessment_type = input.check(&mut errors);
    check_student_and_class(repos, input.student_id, input.class_id, &mut errors).await?;

    match (assessment_type, input.score) {
        (Some(assessment_type), Some(score)) if errors.is_empty() => Ok(GradeFields {
            student_id: input.student_id,
            class_id: input.class_id,
            assessment_type,
            score,
            academic_year: input.academic_year_or_current(now),
        }),
        _ => {
            tracing::warn!(
                student_id = input.student_id,
                class_id = input.class_id,
                fields = ?errors.fields().collect::<Vec<_>>(),
                "Grade rejected"
            );
            errors.into_result()?;
            Err(AppError::internal("Grade input incomplete"))
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> GradeService for GradeManager<U> {
    async fn list(&self) -> AppResult<Vec<GradeView>> {
        let repos = self.uow.repos();
        let (grades, directory) =
            parallel::join2(repos.grades().list(), Directory::load(repos)).await?;
        Ok(grades
            .into_iter()
            .map(|g| grade_view(g, &directory))
            .collect())
    }

    async fn get(&self, id: i32) -> AppResult<GradeView> {
        let grade = self
            .uow
            .repos()
            .grades()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Grade")?;
        self.view(grade).await
    }

    async fn form(&self, id: Option<i32>) -> AppResult<GradeForm> {
        let repos = self.uow.repos();
        let input = match id {
            Some(id) => {
                let grade = repos.grades().find_by_id(id).await?.ok_or_not_found("Grade")?;
                GradeInput::from(&grade)
            }
            None => GradeInput::default(),
        };

        let directory = Directory::load(repos).await?;
        if id.is_none() && (directory.students().is_empty() || directory.classes().is_empty()) {
            tracing::warn!("Grade form requested with no students or classes");
            return Err(AppError::bad_request(NOTHING_TO_GRADE));
        }
        Ok(grade_form(input, &directory))
    }

    async fn create(&self, mut input: GradeInput) -> AppResult<GradeView> {
        input.normalize();
        let submitted = input.clone();
        let now = Utc::now();

        let result = with_transaction!(self.uow, |ctx| {
            let fields = check_grade(&ctx, &input, now).await?;
            ctx.grades().create(fields, now).await
        });

        let grade = match result {
            Ok(grade) => grade,
            Err(e) => return Err(self.redisplay(e, submitted).await),
        };
        tracing::info!(
            grade_id = grade.id,
            student_id = grade.student_id,
            class_id = grade.class_id,
            score = grade.score,
            "Grade recorded"
        );
        self.view(grade).await
    }

    async fn update(&self, id: i32, mut input: GradeInput) -> AppResult<GradeView> {
        input.normalize();
        let submitted = input.clone();
        let now = Utc::now();

        let result = with_transaction!(self.uow, |ctx| {
            let grades = ctx.grades();
            let current = grades.find_by_id(id).await?.ok_or_not_found("Grade")?;
            let fields = check_grade(&ctx, &input, now).await?;
            match grades.update(&current, fields, input.version).await {
                Err(e) if e.is_record_not_updated() => {
                    Err(update_conflict(grades.exists(id).await?, "grade", id))
                }
                other => other,
            }
        });

        let grade = match result {
            Ok(grade) => grade,
            Err(e) => return Err(self.redisplay(e, submitted).await),
        };
        tracing::info!(grade_id = id, version = grade.version, "Grade updated");
        self.view(grade).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let deleted = with_transaction!(self.uow, |ctx| ctx.grades().delete(id).await)?;
        if !deleted {
            tracing::warn!(grade_id = id, "Grade not found for delete");
            return Err(AppError::not_found("Grade"));
        }
        tracing::info!(grade_id = id, "Grade deleted");
        Ok(())
    }

    async fn academic_progress(&self, student_id: i32) -> AppResult<AcademicProgress> {
        let repos = self.uow.repos();
        let student = repos
            .students()
            .find_by_id(student_id)
            .await?
            .ok_or_not_found("Student")?;

        let (grades, directory) = parallel::join2(
            repos.grades().list_for_student(student_id),
            Directory::load(repos),
        )
        .await?;

        let grades = grades
            .into_iter()
            .map(|g| ProgressEntry {
                course_name: directory.course_name(g.class_id),
                grade_id: g.id,
                assessment_type: g.assessment_type,
                score: g.score,
                date_recorded: g.date_recorded,
                academic_year: g.academic_year,
            })
            .collect();

        Ok(AcademicProgress {
            student_id,
            student_name: student.full_name(),
            grades,
        })
    }
}
