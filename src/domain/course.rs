use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::patterns::COURSE_CODE;
use super::SelectOption;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i32,
    #[schema(example = "Intro to Programming")]
    pub name: String,
    #[schema(example = "CS101")]
    pub code: String,
    #[schema(example = 3, minimum = 1, maximum = 10)]
    pub credits: i32,
    pub version: i32,
}

impl Course {
    /// "CODE - Name", the label classes are known by
    pub fn label(&self) -> String {
        course_label(&self.code, &self.name)
    }

    pub fn option(&self) -> SelectOption {
        SelectOption::new(
            self.id,
            format!("{} ({} Credits)", self.label(), self.credits),
        )
    }
}

pub(crate) fn course_label(code: &str, name: &str) -> String {
    format!("{} - {}", code, name)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Course name is required and cannot exceed 100 characters."))]
    #[schema(example = "Intro to Programming")]
    pub name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 10, message = "Course code is required and cannot exceed 10 characters."),
        regex(path = *COURSE_CODE, message = "Course code must contain only uppercase letters and numbers.")
    )]
    #[schema(example = "CS101")]
    pub code: String,
    #[serde(default)]
    #[validate(range(min = 1, max = 10, message = "Credits must be between 1 and 10."))]
    #[schema(example = 3)]
    pub credits: i32,
    pub version: Option<i32>,
}

impl From<&Course> for CourseInput {
    fn from(course: &Course) -> Self {
        Self {
            name: course.name.clone(),
            code: course.code.clone(),
            credits: course.credits,
            version: Some(course.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_rules() {
        let input = CourseInput {
            name: "Algorithms".to_string(),
            code: "cs-201".to_string(),
            credits: 11,
            version: None,
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("code"));
        assert!(fields.contains_key("credits"));
        assert!(!fields.contains_key("name"));
    }

    #[test]
    fn test_course_labels() {
        let course = Course {
            id: 1,
            name: "Algorithms".to_string(),
            code: "CS201".to_string(),
            credits: 4,
            version: 1,
        };
        assert_eq!(course.label(), "CS201 - Algorithms");
        assert_eq!(course.option().label, "CS201 - Algorithms (4 Credits)");
    }
}
