//! Enrollment management: the class roster, the enroll/unenroll toggle and
//! plain enrollment records.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::ConnectionTrait;
use validator::Validate;

use super::container::parallel;
use super::directory::{check_student_and_class, class_views, update_conflict, Directory};
use crate::domain::{
    Enrollment, EnrollmentForm, EnrollmentInput, EnrollmentOutcome, EnrollmentView,
    Notification, Roster, RosterEntry, SetEnrollment,
};
use crate::errors::{AppError, AppResult, FieldErrors, OptionExt};
use crate::infra::{Repositories, UnitOfWork};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const ALREADY_ENROLLED: &str = "Student is already enrolled in this class.";

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait EnrollmentService: Send + Sync {
    /// Every student flagged by membership in the class
    async fn roster(&self, class_id: i32) -> AppResult<Roster>;

    /// Enroll or unenroll one student; repeating a request is harmless
    async fn set_enrollment(&self, request: SetEnrollment) -> AppResult<EnrollmentOutcome>;

    async fn list(&self) -> AppResult<Vec<EnrollmentView>>;

    async fn get(&self, id: i32) -> AppResult<EnrollmentView>;

    async fn form(&self, id: Option<i32>) -> AppResult<EnrollmentForm>;

    async fn create(&self, input: EnrollmentInput) -> AppResult<EnrollmentView>;

    async fn update(&self, id: i32, input: EnrollmentInput) -> AppResult<EnrollmentView>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

/// What a toggle request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Toggle {
    Enrolled,
    AlreadyEnrolled,
    Unenrolled,
    NotEnrolled,
}

impl Toggle {
    fn notification(self) -> Notification {
        match self {
            Toggle::Enrolled => Notification::success("Student Enrolled Successfully"),
            Toggle::Unenrolled => Notification::warning("Student Unenrolled Successfully"),
            Toggle::AlreadyEnrolled => Notification::info(ALREADY_ENROLLED),
            Toggle::NotEnrolled => Notification::info("Student is not enrolled in this class."),
        }
    }
}

pub struct EnrollmentManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> EnrollmentManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn view(&self, enrollment: Enrollment) -> AppResult<EnrollmentView> {
        let directory = Directory::load(self.uow.repos()).await?;
        Ok(enrollment_view(enrollment, &directory))
    }

    async fn form_with(&self, input: EnrollmentInput) -> AppResult<EnrollmentForm> {
        let directory = Directory::load(self.uow.repos()).await?;
        Ok(EnrollmentForm {
            input,
            students: directory.student_options(),
            classes: directory.class_options(),
        })
    }

    async fn redisplay(&self, err: AppError, input: EnrollmentInput) -> AppError {
        if !matches!(err, AppError::Validation(_)) {
            return err;
        }
        match self.form_with(input).await {
            Ok(form) => err.with_form(&form),
            Err(e) => e,
        }
    }
}

fn enrollment_view(enrollment: Enrollment, directory: &Directory) -> EnrollmentView {
    EnrollmentView {
        student_name: directory.student_name(enrollment.student_id),
        class_label: directory.class_label(enrollment.class_id),
        id: enrollment.id,
        student_id: enrollment.student_id,
        class_id: enrollment.class_id,
        grade: enrollment.grade,
        version: enrollment.version,
    }
}

/// Both ends must exist and the pair must not be enrolled already.
async fn check_enrollment<C: ConnectionTrait>(
    repos: &Repositories<'_, C>,
    input: &EnrollmentInput,
    except_id: Option<i32>,
) -> AppResult<()> {
    let mut errors = FieldErrors::new();
    if let Err(e) = input.validate() {
        errors.extend_from(&e);
    }
    check_student_and_class(repos, input.student_id, input.class_id, &mut errors).await?;
    if errors.is_empty()
        && repos
            .enrollments()
            .pair_taken(input.student_id, input.class_id, except_id)
            .await?
    {
        errors.add("studentId", ALREADY_ENROLLED);
    }

    if !errors.is_empty() {
        tracing::warn!(fields = ?errors.fields().collect::<Vec<_>>(), "Enrollment rejected");
    }
    errors.into_result()
}

/// Duplicate pairs that slipped past the check surface as a field error.
fn duplicate_as_field_error(err: AppError) -> AppError {
    if err.is_unique_violation() {
        AppError::invalid_field("studentId", ALREADY_ENROLLED)
    } else {
        err
    }
}

#[async_trait]
impl<U: UnitOfWork> EnrollmentService for EnrollmentManager<U> {
    async fn roster(&self, class_id: i32) -> AppResult<Roster> {
        let repos = self.uow.repos();
        let Some(class) = repos.classes().find_by_id(class_id).await? else {
            tracing::warn!(class_id, "Roster requested for missing class");
            return Err(AppError::not_found("Class"));
        };

        let (students, enrolled, teacher, course) = parallel::join4(
            repos.students().list(),
            repos.enrollments().student_ids_for_class(class_id),
            async {
                match class.teacher_id {
                    Some(id) => repos.teachers().find_by_id(id).await,
                    None => Ok(None),
                }
            },
            async {
                match class.course_id {
                    Some(id) => repos.courses().find_by_id(id).await,
                    None => Ok(None),
                }
            },
        )
        .await?;

        let teachers: HashMap<_, _> = teacher.map(|t| (t.id, t)).into_iter().collect();
        let courses: HashMap<_, _> = course.map(|c| (c.id, c)).into_iter().collect();
        let class = class_views(vec![class], &teachers, &courses)
            .into_iter()
            .next()
            .ok_or_else(|| AppError::internal("Class view missing"))?;

        let students = students
            .into_iter()
            .map(|s| RosterEntry {
                is_enrolled: enrolled.contains(&s.id),
                student_id: s.id,
                first_name: s.first_name,
                last_name: s.last_name,
            })
            .collect();

        Ok(Roster { class, students })
    }

    async fn set_enrollment(&self, request: SetEnrollment) -> AppResult<EnrollmentOutcome> {
        let SetEnrollment {
            class_id,
            student_id,
            should_enroll,
        } = request;

        let result = with_transaction!(self.uow, |ctx| {
            if !ctx.classes().exists(class_id).await? {
                return Err(AppError::not_found("Class"));
            }
            let enrollments = ctx.enrollments();
            if should_enroll {
                if !ctx.students().exists(student_id).await? {
                    return Err(AppError::not_found("Student"));
                }
                if enrollments.find_pair(student_id, class_id).await?.is_some() {
                    return Ok(Toggle::AlreadyEnrolled);
                }
                enrollments.create(student_id, class_id, None).await?;
                Ok(Toggle::Enrolled)
            } else if enrollments.delete_pair(student_id, class_id).await? > 0 {
                Ok(Toggle::Unenrolled)
            } else {
                Ok(Toggle::NotEnrolled)
            }
        });

        let toggle = match result {
            Ok(toggle) => toggle,
            // A concurrent request inserted the pair first
            Err(e) if e.is_unique_violation() => Toggle::AlreadyEnrolled,
            Err(e) => {
                tracing::warn!(class_id, student_id, error = %e, "Enrollment change rejected");
                return Err(e);
            }
        };

        match toggle {
            Toggle::Enrolled => tracing::info!(class_id, student_id, "Student enrolled"),
            Toggle::Unenrolled => tracing::info!(class_id, student_id, "Student unenrolled"),
            _ => tracing::debug!(class_id, student_id, ?toggle, "Enrollment unchanged"),
        }

        let roster = self.roster(class_id).await?;
        Ok(EnrollmentOutcome {
            notification: toggle.notification(),
            roster,
        })
    }

    async fn list(&self) -> AppResult<Vec<EnrollmentView>> {
        let repos = self.uow.repos();
        let (enrollments, directory) =
            parallel::join2(repos.enrollments().list(), Directory::load(repos)).await?;
        Ok(enrollments
            .into_iter()
            .map(|e| enrollment_view(e, &directory))
            .collect())
    }

    async fn get(&self, id: i32) -> AppResult<EnrollmentView> {
        let enrollment = self
            .uow
            .repos()
            .enrollments()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Enrollment")?;
        self.view(enrollment).await
    }

    async fn form(&self, id: Option<i32>) -> AppResult<EnrollmentForm> {
        let input = match id {
            Some(id) => {
                let enrollment = self
                    .uow
                    .repos()
                    .enrollments()
                    .find_by_id(id)
                    .await?
                    .ok_or_not_found("Enrollment")?;
                EnrollmentInput::from(&enrollment)
            }
            None => EnrollmentInput::default(),
        };
        self.form_with(input).await
    }

    async fn create(&self, input: EnrollmentInput) -> AppResult<EnrollmentView> {
        let submitted = input.clone();
        let result = with_transaction!(self.uow, |ctx| {
            check_enrollment(&ctx, &input, None).await?;
            ctx.enrollments()
                .create(input.student_id, input.class_id, input.grade.clone())
                .await
        })
        .map_err(duplicate_as_field_error);

        let enrollment = match result {
            Ok(enrollment) => enrollment,
            Err(e) => return Err(self.redisplay(e, submitted).await),
        };
        tracing::info!(
            enrollment_id = enrollment.id,
            student_id = enrollment.student_id,
            class_id = enrollment.class_id,
            "Enrollment created"
        );
        self.view(enrollment).await
    }

    async fn update(&self, id: i32, input: EnrollmentInput) -> AppResult<EnrollmentView> {
        let submitted = input.clone();
        let result = with_transaction!(self.uow, |ctx| {
            let enrollments = ctx.enrollments();
            let current = enrollments
                .find_by_id(id)
                .await?
                .ok_or_not_found("Enrollment")?;
            check_enrollment(&ctx, &input, Some(id)).await?;
            match enrollments.update(&current, &input).await {
                Err(e) if e.is_record_not_updated() => {
                    let still_exists = enrollments.find_by_id(id).await?.is_some();
                    Err(update_conflict(still_exists, "enrollment", id))
                }
                other => other,
            }
        })
        .map_err(duplicate_as_field_error);

        let enrollment = match result {
            Ok(enrollment) => enrollment,
            Err(e) => return Err(self.redisplay(e, submitted).await),
        };
        tracing::info!(enrollment_id = id, version = enrollment.version, "Enrollment updated");
        self.view(enrollment).await
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let deleted = with_transaction!(self.uow, |ctx| ctx.enrollments().delete(id).await)?;
        if !deleted {
            tracing::warn!(enrollment_id = id, "Enrollment not found for delete");
            return Err(AppError::not_found("Enrollment"));
        }
        tracing::info!(enrollment_id = id, "Enrollment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NotificationLevel;

    #[test]
    fn test_toggle_notifications() {
        assert_eq!(Toggle::Enrolled.notification().level, NotificationLevel::Success);
        assert_eq!(
            Toggle::Unenrolled.notification().message,
            "Student Unenrolled Successfully"
        );
        assert_eq!(Toggle::AlreadyEnrolled.notification().level, NotificationLevel::Info);
        assert_eq!(Toggle::NotEnrolled.notification().level, NotificationLevel::Info);
    }

    #[test]
    fn test_plain_errors_are_not_rewritten() {
        let err = duplicate_as_field_error(AppError::not_found("Class"));
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
