use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{ClassView, SelectOption};

/// Membership of one student in one class
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: i32,
    pub student_id: i32,
    pub class_id: i32,
    /// Legacy letter grade, independent of recorded assessments
    #[schema(example = "A")]
    pub grade: Option<String>,
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentView {
    pub id: i32,
    pub student_id: i32,
    pub class_id: i32,
    pub grade: Option<String>,
    pub version: i32,
    #[schema(example = "Ada Lovelace")]
    pub student_name: String,
    #[schema(example = "CS101 - Intro to Programming")]
    pub class_label: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentInput {
    #[serde(default)]
    #[validate(range(min = 1, message = "Student is required."))]
    pub student_id: i32,
    #[serde(default)]
    #[validate(range(min = 1, message = "Class is required."))]
    pub class_id: i32,
    #[validate(length(max = 2, message = "Grade cannot exceed 2 characters."))]
    #[schema(example = "A")]
    pub grade: Option<String>,
    pub version: Option<i32>,
}

impl From<&Enrollment> for EnrollmentInput {
    fn from(enrollment: &Enrollment) -> Self {
        Self {
            student_id: enrollment.student_id,
            class_id: enrollment.class_id,
            grade: enrollment.grade.clone(),
            version: Some(enrollment.version),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentForm {
    pub input: EnrollmentInput,
    pub students: Vec<SelectOption>,
    pub classes: Vec<SelectOption>,
}

/// Enroll/unenroll toggle
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetEnrollment {
    pub class_id: i32,
    pub student_id: i32,
    pub should_enroll: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Warning,
    Info,
}

/// Message for the person who triggered a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Notification {
    pub level: NotificationLevel,
    #[schema(example = "Student Enrolled Successfully")]
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }
}

/// Every student, flagged by membership in one class
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    pub class: ClassView,
    pub students: Vec<RosterEntry>,
}

impl Roster {
    pub fn enrolled_ids(&self) -> Vec<i32> {
        self.students
            .iter()
            .filter(|s| s.is_enrolled)
            .map(|s| s.student_id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub student_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub is_enrolled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentOutcome {
    pub notification: Notification,
    pub roster: Roster,
}
