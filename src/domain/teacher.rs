use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::patterns::LETTERS;
use super::{full_name, SelectOption};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: i32,
    #[schema(example = "Alan")]
    pub first_name: String,
    #[schema(example = "Turing")]
    pub last_name: String,
    pub version: i32,
}

impl Teacher {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    pub fn option(&self) -> SelectOption {
        SelectOption::new(self.id, self.full_name())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherInput {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 50, message = "First name is required and cannot exceed 50 characters."),
        regex(path = *LETTERS, message = "First name can only contain letters.")
    )]
    #[schema(example = "Alan")]
    pub first_name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 50, message = "Last name is required and cannot exceed 50 characters."),
        regex(path = *LETTERS, message = "Last name can only contain letters.")
    )]
    #[schema(example = "Turing")]
    pub last_name: String,
    pub version: Option<i32>,
}

impl From<&Teacher> for TeacherInput {
    fn from(teacher: &Teacher) -> Self {
        Self {
            first_name: teacher.first_name.clone(),
            last_name: teacher.last_name.clone(),
            version: Some(teacher.version),
        }
    }
}
