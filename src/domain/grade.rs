use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::patterns::ACADEMIC_YEAR;
use super::{ParseEnumError, SelectOption};
use crate::errors::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AssessmentType {
    Quiz,
    Midterm,
    Final,
    Homework,
    Project,
}

impl AssessmentType {
    pub const ALL: [AssessmentType; 5] = [
        AssessmentType::Quiz,
        AssessmentType::Midterm,
        AssessmentType::Final,
        AssessmentType::Homework,
        AssessmentType::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentType::Quiz => "Quiz",
            AssessmentType::Midterm => "Midterm",
            AssessmentType::Final => "Final",
            AssessmentType::Homework => "Homework",
            AssessmentType::Project => "Project",
        }
    }
}

impl FromStr for AssessmentType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssessmentType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("assessment type", s))
    }
}

impl fmt::Display for AssessmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scored assessment of a student within a class
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: i32,
    pub student_id: i32,
    pub class_id: i32,
    pub assessment_type: AssessmentType,
    #[schema(example = 92.5)]
    pub score: f64,
    pub date_recorded: DateTime<Utc>,
    #[schema(example = "2024")]
    pub academic_year: String,
    pub version: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeView {
    pub id: i32,
    pub student_id: i32,
    pub class_id: i32,
    pub assessment_type: AssessmentType,
    pub score: f64,
    pub date_recorded: DateTime<Utc>,
    pub academic_year: String,
    pub version: i32,
    #[schema(example = "Ada Lovelace")]
    pub student_name: String,
    #[schema(example = "CS101 - Intro to Programming")]
    pub class_label: String,
    #[schema(example = "Intro to Programming")]
    pub course_name: Option<String>,
}

/// Grade create/edit submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeInput {
    #[serde(default)]
    #[validate(range(min = 1, message = "Student is required."))]
    pub student_id: i32,
    #[serde(default)]
    #[validate(range(min = 1, message = "Class is required."))]
    pub class_id: i32,
    #[serde(default)]
    #[schema(example = "Final")]
    pub assessment_type: String,
    #[validate(
        required(message = "Score is required."),
        range(min = 0.0, max = 100.0, message = "Score must be between 0 and 100.")
    )]
    #[schema(example = 92.5)]
    pub score: Option<f64>,
    /// Defaults to the current year when omitted
    #[validate(regex(path = *ACADEMIC_YEAR, message = "Academic year must be a 4-digit year."))]
    #[schema(example = "2024")]
    pub academic_year: Option<String>,
    pub version: Option<i32>,
}

impl GradeInput {
    /// Treat a blank academic year as omitted.
    pub fn normalize(&mut self) {
        if self
            .academic_year
            .as_deref()
            .map_or(false, |y| y.trim().is_empty())
        {
            self.academic_year = None;
        }
    }

    /// Validate the format rules and parse the assessment type, collecting
    /// every failure into `errors`.
    pub fn check(&self, errors: &mut FieldErrors) -> Option<AssessmentType> {
        if let Err(e) = self.validate() {
            errors.extend_from(&e);
        }
        let raw = self.assessment_type.trim();
        if raw.is_empty() {
            errors.add("assessmentType", "Assessment type is required.");
            return None;
        }
        match raw.parse() {
            Ok(kind) => Some(kind),
            Err(_) => {
                errors.add(
                    "assessmentType",
                    "Assessment type must be Quiz, Midterm, Final, Homework or Project.",
                );
                None
            }
        }
    }

    pub fn academic_year_or_current(&self, now: DateTime<Utc>) -> String {
        self.academic_year
            .clone()
            .unwrap_or_else(|| now.year().to_string())
    }
}

impl From<&Grade> for GradeInput {
    fn from(grade: &Grade) -> Self {
        Self {
            student_id: grade.student_id,
            class_id: grade.class_id,
            assessment_type: grade.assessment_type.to_string(),
            score: Some(grade.score),
            academic_year: Some(grade.academic_year.clone()),
            version: Some(grade.version),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GradeForm {
    pub input: GradeInput,
    pub students: Vec<SelectOption>,
    pub classes: Vec<SelectOption>,
    pub assessment_types: Vec<AssessmentType>,
}

/// All grades of one student
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcademicProgress {
    pub student_id: i32,
    #[schema(example = "Ada Lovelace")]
    pub student_name: String,
    pub grades: Vec<ProgressEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub grade_id: i32,
    pub course_name: Option<String>,
    pub assessment_type: AssessmentType,
    pub score: f64,
    pub date_recorded: DateTime<Utc>,
    pub academic_year: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input() -> GradeInput {
        GradeInput {
            student_id: 1,
            class_id: 1,
            assessment_type: "Final".to_string(),
            score: Some(100.0),
            academic_year: None,
            version: None,
        }
    }

    #[test]
    fn test_valid_input() {
        let mut errors = FieldErrors::new();
        assert_eq!(input().check(&mut errors), Some(AssessmentType::Final));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_score_out_of_range() {
        let mut errors = FieldErrors::new();
        let bad = GradeInput {
            score: Some(101.0),
            ..input()
        };
        bad.check(&mut errors);
        assert!(errors.contains("score"));
    }

    #[test]
    fn test_all_failures_are_collected() {
        let mut errors = FieldErrors::new();
        let bad = GradeInput {
            student_id: 0,
            class_id: 0,
            assessment_type: "Exam".to_string(),
            score: None,
            academic_year: Some("24".to_string()),
            version: None,
        };
        assert_eq!(bad.check(&mut errors), None);
        for field in ["studentId", "classId", "assessmentType", "score", "academicYear"] {
            assert!(errors.contains(field), "missing {}", field);
        }
    }

    #[test]
    fn test_academic_year_defaults_to_current() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        let mut blank = GradeInput {
            academic_year: Some("  ".to_string()),
            ..input()
        };
        blank.normalize();
        assert_eq!(blank.academic_year_or_current(now), "2025");

        let explicit = GradeInput {
            academic_year: Some("2023".to_string()),
            ..input()
        };
        assert_eq!(explicit.academic_year_or_current(now), "2023");
    }
}
