//! Label and option lookups shared by the workflows.
//!
//! Views and form option lists need names for the ids they carry. A
//! [`Directory`] loads the referenced tables once and answers from memory.

use std::collections::HashMap;

use sea_orm::ConnectionTrait;

use super::container::parallel;
use crate::domain::{
    class::class_label, Class, ClassView, Course, SelectOption, Student, Teacher,
};
use crate::errors::{AppError, AppResult, FieldErrors};
use crate::infra::Repositories;

pub(crate) struct Directory {
    students: Vec<Student>,
    classes: Vec<ClassView>,
    courses: HashMap<i32, Course>,
}

impl Directory {
    pub async fn load<C: ConnectionTrait>(repos: Repositories<'_, C>) -> AppResult<Self> {
        let (students, classes, teachers, courses) = parallel::join4(
            repos.students().list(),
            repos.classes().list(),
            repos.teachers().list(),
            repos.courses().list(),
        )
        .await?;

        let courses: HashMap<i32, Course> = courses.into_iter().map(|c| (c.id, c)).collect();
        let teachers: HashMap<i32, Teacher> = teachers.into_iter().map(|t| (t.id, t)).collect();
        let classes = class_views(classes, &teachers, &courses);

        Ok(Self {
            students,
            classes,
            courses,
        })
    }

    pub fn student_name(&self, id: i32) -> String {
        self.students
            .iter()
            .find(|s| s.id == id)
            .map(Student::full_name)
            .unwrap_or_else(|| format!("Student #{}", id))
    }

    pub fn class(&self, id: i32) -> Option<&ClassView> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn class_label(&self, id: i32) -> String {
        self.class(id)
            .map(ClassView::label)
            .unwrap_or_else(|| class_label(id, None))
    }

    /// Name of the course a class teaches
    pub fn course_name(&self, class_id: i32) -> Option<String> {
        self.class(class_id)
            .and_then(|c| c.course_id)
            .and_then(|id| self.courses.get(&id))
            .map(|c| c.name.clone())
    }

    pub fn student_options(&self) -> Vec<SelectOption> {
        self.students.iter().map(Student::option).collect()
    }

    pub fn class_options(&self) -> Vec<SelectOption> {
        self.classes.iter().map(ClassView::option).collect()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn classes(&self) -> &[ClassView] {
        &self.classes
    }
}

/// Attach labels to classes.
pub(crate) fn class_views(
    classes: Vec<Class>,
    teachers: &HashMap<i32, Teacher>,
    courses: &HashMap<i32, Course>,
) -> Vec<ClassView> {
    classes
        .into_iter()
        .map(|class| {
            let course_label = class
                .course_id
                .and_then(|id| courses.get(&id))
                .map(Course::label);
            let teacher_name = class
                .teacher_id
                .and_then(|id| teachers.get(&id))
                .map(Teacher::full_name);
            ClassView::new(class, course_label, teacher_name)
        })
        .collect()
}

/// Record a field error for each of the student and class that does not
/// exist. Ids already flagged by format rules are skipped.
pub(crate) async fn check_student_and_class<C: ConnectionTrait>(
    repos: &Repositories<'_, C>,
    student_id: i32,
    class_id: i32,
    errors: &mut FieldErrors,
) -> AppResult<()> {
    if !errors.contains("studentId") && !repos.students().exists(student_id).await? {
        errors.add("studentId", "Selected student does not exist.");
    }
    if !errors.contains("classId") && !repos.classes().exists(class_id).await? {
        errors.add("classId", "Selected class does not exist.");
    }
    Ok(())
}

/// Resolve an update that matched no row: a vanished row is NotFound, a
/// row that is still there was changed underneath us.
pub(crate) fn update_conflict(still_exists: bool, entity: &'static str, id: i32) -> AppError {
    if still_exists {
        tracing::error!(entity, id, "Concurrency conflict on update");
        AppError::ConcurrencyConflict { entity, id }
    } else {
        tracing::warn!(entity, id, "Record vanished during update");
        AppError::not_found(capitalized(entity).as_str())
    }
}

fn capitalized(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_update_conflict_resolution() {
        let gone = update_conflict(false, "grade", 4);
        assert_eq!(gone.status(), StatusCode::NOT_FOUND);
        assert_eq!(gone.to_string(), "Grade not found.");

        let stale = update_conflict(true, "grade", 4);
        assert!(matches!(
            stale,
            AppError::ConcurrencyConflict { entity: "grade", id: 4 }
        ));
    }

    #[test]
    fn test_class_views_label_missing_references() {
        let class = Class {
            id: 9,
            teacher_id: None,
            course_id: Some(1),
            time: None,
            day: None,
            version: 1,
        };
        let course = Course {
            id: 1,
            name: "Intro".to_string(),
            code: "CS101".to_string(),
            credits: 3,
            version: 1,
        };
        let views = class_views(vec![class], &HashMap::new(), &HashMap::from([(1, course)]));
        assert_eq!(views[0].label(), "CS101 - Intro");
        assert_eq!(views[0].teacher_name, None);
    }
}
