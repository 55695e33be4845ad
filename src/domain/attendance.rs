use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{ParseEnumError, SelectOption};
use crate::errors::FieldErrors;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AttendanceStatus {
    Present,
    #[default]
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Absent,
        AttendanceStatus::Late,
        AttendanceStatus::Excused,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Excused => "Excused",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttendanceStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("attendance status", s))
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presence of one student at one class meeting
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: i32,
    pub student_id: i32,
    pub class_id: i32,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceView {
    pub id: i32,
    pub student_id: i32,
    pub class_id: i32,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub version: i32,
    pub student_name: String,
    pub class_label: String,
    pub course_name: Option<String>,
}

fn default_status() -> String {
    AttendanceStatus::default().to_string()
}

/// Attendance create/edit submission
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceInput {
    #[serde(default)]
    #[validate(range(min = 1, message = "Student is required."))]
    pub student_id: i32,
    #[serde(default)]
    #[validate(range(min = 1, message = "Class is required."))]
    pub class_id: i32,
    #[validate(required(message = "Date is required."))]
    pub date: Option<NaiveDate>,
    /// Defaults to "Absent"
    #[serde(default = "default_status")]
    #[schema(example = "Present")]
    pub status: String,
    pub version: Option<i32>,
}

impl Default for AttendanceInput {
    fn default() -> Self {
        Self {
            student_id: 0,
            class_id: 0,
            date: None,
            status: default_status(),
            version: None,
        }
    }
}

impl AttendanceInput {
    /// Validate the format rules and parse the status, collecting every
    /// failure into `errors`.
    pub fn check(&self, errors: &mut FieldErrors) -> Option<AttendanceStatus> {
        if let Err(e) = self.validate() {
            errors.extend_from(&e);
        }
        let raw = self.status.trim();
        if raw.is_empty() {
            errors.add("status", "Status is required.");
            return None;
        }
        match raw.parse() {
            Ok(status) => Some(status),
            Err(_) => {
                errors.add("status", "Status must be Present, Absent, Late or Excused.");
                None
            }
        }
    }
}

impl From<&Attendance> for AttendanceInput {
    fn from(attendance: &Attendance) -> Self {
        Self {
            student_id: attendance.student_id,
            class_id: attendance.class_id,
            date: Some(attendance.date),
            status: attendance.status.to_string(),
            version: Some(attendance.version),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceForm {
    pub input: AttendanceInput,
    pub students: Vec<SelectOption>,
    pub classes: Vec<SelectOption>,
    pub statuses: Vec<AttendanceStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(status: &str) -> AttendanceInput {
        AttendanceInput {
            student_id: 1,
            class_id: 2,
            date: NaiveDate::from_ymd_opt(2024, 9, 2),
            status: status.to_string(),
            version: None,
        }
    }

    #[test]
    fn test_status_is_closed_set() {
        let mut errors = FieldErrors::new();
        assert_eq!(input("Present").check(&mut errors), Some(AttendanceStatus::Present));
        assert!(errors.is_empty());

        assert_eq!(input("Maybe").check(&mut errors), None);
        assert!(errors.contains("status"));
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let mut errors = FieldErrors::new();
        let bad = AttendanceInput {
            student_id: 0,
            class_id: 0,
            date: None,
            status: " ".to_string(),
            version: None,
        };
        bad.check(&mut errors);
        for field in ["studentId", "classId", "date", "status"] {
            assert!(errors.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_status_defaults_to_absent() {
        let parsed: AttendanceInput =
            serde_json::from_str(r#"{"studentId":1,"classId":1,"date":"2024-09-02"}"#).unwrap();
        assert_eq!(parsed.status, "Absent");
    }
}
