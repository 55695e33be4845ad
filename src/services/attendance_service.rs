//! Attendance workflow: per-date presence of a student at a class.

use async_trait::async_trait;
use std::sync::Arc;

use sea_orm::ConnectionTrait;

use super::container::parallel;
use super::directory::{check_student_and_class, update_conflict, Directory};
use crate::domain::{
    Attendance, AttendanceForm, AttendanceInput, AttendanceStatus, AttendanceView,
};
use crate::errors::{AppError, AppResult, FieldErrors, OptionExt};
use crate::infra::repositories::AttendanceFields;
use crate::infra::{Repositories, UnitOfWork};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AttendanceService: Send + Sync {
    /// All records, newest date first
    async fn list(&self) -> AppResult<Vec<AttendanceView>>;

    async fn get(&self, id: i32) -> AppResult<AttendanceView>;

    async fn form(&self, id: Option<i32>) -> AppResult<AttendanceForm>;

    async fn create(&self, input: AttendanceInput) -> AppResult<AttendanceView>;

    async fn update(&self, id: i32, input: AttendanceInput) -> AppResult<AttendanceView>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

pub struct AttendanceManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AttendanceManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn view(&self, attendance: Attendance) -> AppResult<AttendanceView> {
        let directory = Directory::load(self.uow.repos()).await?;
        Ok(attendance_view(attendance, &directory))
    }

    async fn redisplay(&self, err: AppError, input: AttendanceInput) -> AppError {
        if !matches!(err, AppError::Validation(_)) {
            return err;
        }
        match Directory::load(self.uow.repos()).await {
            Ok(directory) => err.with_form(&attendance_form(input, &directory)),
            Err(e) => e,
        }
    }
}

fn attendance_view(attendance: Attendance, directory: &Directory) -> AttendanceView {
    AttendanceView {
        student_name: directory.student_name(attendance.student_id),
        class_label: directory.class_label(attendance.class_id),
        course_name: directory.course_name(attendance.class_id),
        id: attendance.id,
        student_id: attendance.student_id,
        class_id: attendance.class_id,
        date: attendance.date,
        status: attendance.status,
        version: attendance.version,
    }
}

fn attendance_form(input: AttendanceInput, directory: &Directory) -> AttendanceForm {
    AttendanceForm {
        input,
        students: directory.student_options(),
        classes: directory.class_options(),
        statuses: AttendanceStatus::ALL.to_vec(),
    }
}

async fn check_attendance<C: ConnectionTrait>(
    repos: &Repositories<'_, C>,
    input: &AttendanceInput,
) -> AppResult<AttendanceFields> {
    let mut errors = FieldErrors::new();
    let status = input.check(&mut errors);
    check_student_and_class(repos, input.student_id, input.class_id, &mut errors).await?;

    match (status, input.date) {
        (Some(status), Some(date)) if errors.is_empty() => Ok(AttendanceFields {
            student_id: input.student_id,
            class_id: input.class_id,
            date,
            status,
        }),
        _ => {
            tracing::warn!(
                student_id = input.student_id,
                class_id = input.class_id,
                fields = ?errors.fields().collect::<Vec<_>>(),
                "Attendance rejected"
            );
            errors.into_result()?;
            Err(AppError::internal("Attendance input incomplete"))
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> AttendanceService for AttendanceManager<U> {
    async fn list(&self) -> AppResult<Vec<AttendanceView>> {
        let repos = self.uow.repos();
        let (records, directory) =
            parallel::join2(repos.attendances().list(), Directory::load(repos)).await?;
        Ok(records
            .into_iter()
            .map(|a| attendance_view(a, &directory))
            .collect())
    }

    async fn get(&self, id: i32) -> AppResult<AttendanceView> {
        let attendance = self
            .uow
            .repos()
            .attendances()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Attendance")?;
        self.view(attendance).await
    }

    async fn form(&self, id: Option<i32>) -> AppResult<AttendanceForm> {
        let repos = self.uow.repos();
        let input = match id {
            Some(id) => {
                let attendance = repos
                    .attendances()
                    .find_by_id(id)
                    .await?
                    .ok_or_not_found("Attendance")?;
                AttendanceInput::from(&attendance)
            }
            None => AttendanceInput::default(),
        };
        let directory = Directory::load(repos).await?;
        Ok(attendance_form(input, &directory))
    }

    async fn create(&self, input: AttendanceInput) -> AppResult<AttendanceView> {
        let submitted = input.clone();
        let result = with_transaction!(self.uow, |ctx| {
            let fields = check_attendance(&ctx, &input).await?;
            ctx.attendances().create(fields).await
        });

        let attendance = match result {
            Ok(attendance) => attendance,
            Err(e) => return Err(self.redisplay(e, submitted).await),
        };
        tracing::info!(
            attendance_id = attendance.id,
            student_id = attendance.student_id,
            class_id = attendance.class_id,
            status = %attendance.status,
            "Attendance recorded"
        );
        self.view(attendance).await
    }

    async fn update(&self, id: i32, input: AttendanceInput) -> AppResult<AttendanceView> {
        let submitted = input.clone();
        let result = with_transaction!(self.uow, |ctx| {
            let attendances = ctx.attendances();
            let current = attendances
                .find_by_id(id)
                .await?
                .ok_or_not_found("Attendance")?;
            let fields = check_attendance(&ctx, &input).await?;
            match attendances.update(&current, fields, input.version).await {
                Err(e) if e.is_record_not_updated() => {
                    Err(update_conflict(attendances.exists(id).await?, "attendance", id))
                }
                other => other,
            }
        });

        let attendance = match result {
            Ok(attendance) => attendance,
            Err(e) => return Err(self.redisplay(e, submitted).await),
        };
        tracing::info!(attendance_id = id, version = attendance.version, "Attendance updated");
        self.view(attendance).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let deleted = with_transaction!(self.uow, |ctx| ctx.attendances().delete(id).await)?;
        if !deleted {
            tracing::warn!(attendance_id = id, "Attendance not found for delete");
            return Err(AppError::not_found("Attendance"));
        }
        tracing::info!(attendance_id = id, "Attendance deleted");
        Ok(())
    }
}
