use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use super::base::{self, next_version, update_versioned, Versioned};
use super::entities::grade::{ActiveModel, Column, Entity as GradeEntity};
use crate::domain::{AssessmentType, Grade};
use crate::errors::AppResult;

impl Versioned for GradeEntity {
    fn version_column() -> Column {
        Column::Version
    }
}

/// Validated grade columns; `date_recorded` is managed separately
#[derive(Debug, Clone)]
pub struct GradeFields {
    pub student_id: i32,
    pub class_id: i32,
    pub assessment_type: AssessmentType,
    pub score: f64,
    pub academic_year: String,
}

pub struct GradeRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> GradeRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Grade>> {
        GradeEntity::find_by_id(id)
            .one(self.conn)
            .await?
            .map(Grade::try_from)
            .transpose()
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        base::exists::<GradeEntity, _>(self.conn, id).await
    }

    pub async fn list(&self) -> AppResult<Vec<Grade>> {
        GradeEntity::find()
            .order_by_asc(Column::Id)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Grade::try_from)
            .collect()
    }

    /// One student's grades, most recent first
    pub async fn list_for_student(&self, student_id: i32) -> AppResult<Vec<Grade>> {
        GradeEntity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::DateRecorded)
            .order_by_desc(Column::Id)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Grade::try_from)
            .collect()
    }

    pub async fn create(&self, fields: GradeFields, date_recorded: DateTime<Utc>) -> AppResult<Grade> {
        let model = ActiveModel {
            id: NotSet,
            student_id: Set(fields.student_id),
            class_id: Set(fields.class_id),
            assessment_type: Set(fields.assessment_type.to_string()),
            score: Set(fields.score),
            date_recorded: Set(date_recorded),
            academic_year: Set(fields.academic_year),
            version: Set(1),
        }
        .insert(self.conn)
        .await?;
        Grade::try_from(model)
    }

    /// Update everything but the recording date.
    pub async fn update(
        &self,
        current: &Grade,
        fields: GradeFields,
        expected_version: Option<i32>,
    ) -> AppResult<Grade> {
        let model = ActiveModel {
            id: Set(current.id),
            student_id: Set(fields.student_id),
            class_id: Set(fields.class_id),
            assessment_type: Set(fields.assessment_type.to_string()),
            score: Set(fields.score),
            date_recorded: NotSet,
            academic_year: Set(fields.academic_year),
            version: Set(next_version(current.version, expected_version)),
        };
        let model = update_versioned::<GradeEntity, _>(self.conn, model, expected_version).await?;
        Grade::try_from(model)
    }

    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        base::delete_by_id::<GradeEntity, _>(self.conn, id).await
    }
}
