use sea_orm::entity::prelude::*;

use super::corrupt;
use crate::domain::{AssessmentType, Grade};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub student_id: i32,
    pub class_id: i32,
    pub assessment_type: String,
    #[sea_orm(column_type = "Double")]
    pub score: f64,
    pub date_recorded: DateTimeUtc,
    pub academic_year: String,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::student::Entity",
        from = "Column::StudentId",
        to = "super::student::Column::Id",
        on_delete = "Cascade"
    )]
    Student,

    #[sea_orm(
        belongs_to = "super::class::Entity",
        from = "Column::ClassId",
        to = "super::class::Column::Id",
        on_delete = "Cascade"
    )]
    Class,
}

impl Related<super::student::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Grade {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let assessment_type = model
            .assessment_type
            .parse::<AssessmentType>()
            .map_err(|e| corrupt("grades", model.id, e))?;
        Ok(Grade {
            id: model.id,
            student_id: model.student_id,
            class_id: model.class_id,
            assessment_type,
            score: model.score,
            date_recorded: model.date_recorded,
            academic_year: model.academic_year,
            version: model.version,
        })
    }
}
