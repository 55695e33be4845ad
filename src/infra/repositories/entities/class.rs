use sea_orm::entity::prelude::*;

use super::corrupt;
use crate::domain::{Class, DayOfWeek};
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub teacher_id: Option<i32>,
    pub course_id: Option<i32>,
    pub time: Option<Time>,
    pub day: Option<String>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teacher::Entity",
        from = "Column::TeacherId",
        to = "super::teacher::Column::Id",
        on_delete = "Restrict"
    )]
    Teacher,

    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Restrict"
    )]
    Course,

    #[sea_orm(has_many = "super::enrollment::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::grade::Entity")]
    Grades,
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendances,
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::grade::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grades.def()
    }
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Class {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let day = model
            .day
            .as_deref()
            .map(str::parse::<DayOfWeek>)
            .transpose()
            .map_err(|e| corrupt("classes", model.id, e))?;
        Ok(Class {
            id: model.id,
            teacher_id: model.teacher_id,
            course_id: model.course_id,
            time: model.time,
            day,
            version: model.version,
        })
    }
}
