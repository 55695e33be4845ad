use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::patterns::LETTERS;
use super::{full_name, SelectOption};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i32,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub version: i32,
}

impl Student {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    pub fn option(&self) -> SelectOption {
        SelectOption::new(self.id, self.full_name())
    }
}

/// Student create/edit submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 50, message = "First name is required and cannot exceed 50 characters."),
        regex(path = *LETTERS, message = "First name can only contain letters.")
    )]
    #[schema(example = "Ada")]
    pub first_name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 50, message = "Last name is required and cannot exceed 50 characters."),
        regex(path = *LETTERS, message = "Last name can only contain letters.")
    )]
    #[schema(example = "Lovelace")]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    /// Concurrency token read with the record; omit for last-writer-wins
    pub version: Option<i32>,
}

impl From<&Student> for StudentInput {
    fn from(student: &Student) -> Self {
        Self {
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            date_of_birth: student.date_of_birth,
            version: Some(student.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_names_must_be_letters() {
        let input = StudentInput {
            first_name: "Ada9".to_string(),
            last_name: String::new(),
            ..Default::default()
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("first_name"));
        assert!(fields.contains_key("last_name"));
    }

    #[test]
    fn test_student_label() {
        let student = Student {
            id: 3,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            date_of_birth: None,
            version: 1,
        };
        assert_eq!(student.option(), SelectOption::new(3, "Ada Lovelace"));
    }
}
