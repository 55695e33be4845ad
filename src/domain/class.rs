use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ParseEnumError, SelectOption};
use crate::errors::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl FromStr for DayOfWeek {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DayOfWeek::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("day of week", s))
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled offering of a course, taught by a teacher.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: i32,
    pub teacher_id: Option<i32>,
    pub course_id: Option<i32>,
    #[schema(value_type = Option<String>, example = "09:30:00")]
    pub time: Option<NaiveTime>,
    pub day: Option<DayOfWeek>,
    pub version: i32,
}

/// Class with the labels of the rows it points at
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassView {
    pub id: i32,
    pub teacher_id: Option<i32>,
    pub course_id: Option<i32>,
    #[schema(value_type = Option<String>, example = "09:30:00")]
    pub time: Option<NaiveTime>,
    pub day: Option<DayOfWeek>,
    pub version: i32,
    /// "CODE - Name" of the course, if any
    #[schema(example = "CS101 - Intro to Programming")]
    pub course_label: Option<String>,
    #[schema(example = "Alan Turing")]
    pub teacher_name: Option<String>,
}

impl ClassView {
    pub fn new(class: Class, course_label: Option<String>, teacher_name: Option<String>) -> Self {
        Self {
            id: class.id,
            teacher_id: class.teacher_id,
            course_id: class.course_id,
            time: class.time,
            day: class.day,
            version: class.version,
            course_label,
            teacher_name,
        }
    }

    pub fn label(&self) -> String {
        class_label(self.id, self.course_label.as_deref())
    }

    pub fn option(&self) -> SelectOption {
        SelectOption::new(self.id, self.label())
    }
}

/// Course label, or a placeholder for classes without a course.
pub fn class_label(class_id: i32, course_label: Option<&str>) -> String {
    course_label
        .map(str::to_string)
        .unwrap_or_else(|| format!("Class #{}", class_id))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassInput {
    pub teacher_id: Option<i32>,
    pub course_id: Option<i32>,
    #[schema(value_type = Option<String>, example = "09:30:00")]
    pub time: Option<NaiveTime>,
    #[schema(example = "Monday")]
    pub day: Option<String>,
    pub version: Option<i32>,
}

impl ClassInput {
    /// Parse the day, recording a field error when it is not a weekday name.
    /// Blank counts as unset.
    pub fn parse_day(&self, errors: &mut FieldErrors) -> Option<DayOfWeek> {
        let raw = self.day.as_deref().map(str::trim).filter(|d| !d.is_empty())?;
        match raw.parse() {
            Ok(day) => Some(day),
            Err(_) => {
                errors.add("day", "Day must be a day of the week (Monday to Sunday).");
                None
            }
        }
    }
}

impl From<&Class> for ClassInput {
    fn from(class: &Class) -> Self {
        Self {
            teacher_id: class.teacher_id,
            course_id: class.course_id,
            time: class.time,
            day: class.day.map(|d| d.to_string()),
            version: Some(class.version),
        }
    }
}

/// Class create/edit form: current input plus teacher and course options
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassForm {
    pub input: ClassInput,
    pub teachers: Vec<SelectOption>,
    pub courses: Vec<SelectOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day() {
        let mut errors = FieldErrors::new();
        let input = ClassInput {
            day: Some("Friday".to_string()),
            ..Default::default()
        };
        assert_eq!(input.parse_day(&mut errors), Some(DayOfWeek::Friday));

        let blank = ClassInput {
            day: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.parse_day(&mut errors), None);
        assert!(errors.is_empty());

        let bad = ClassInput {
            day: Some("Funday".to_string()),
            ..Default::default()
        };
        assert_eq!(bad.parse_day(&mut errors), None);
        assert!(errors.contains("day"));
    }

    #[test]
    fn test_label_falls_back_to_id() {
        assert_eq!(class_label(7, None), "Class #7");
        assert_eq!(class_label(7, Some("CS101 - Intro")), "CS101 - Intro");
    }
}
