use chrono::NaiveTime;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, QueryOrder, Set};

use super::base::{self, next_version, update_versioned, Versioned};
use super::entities::class::{ActiveModel, Column, Entity as ClassEntity};
use crate::domain::{Class, DayOfWeek};
use crate::errors::AppResult;

impl Versioned for ClassEntity {
    fn version_column() -> Column {
        Column::Version
    }
}

/// Validated class columns
#[derive(Debug, Clone, Default)]
pub struct ClassFields {
    pub teacher_id: Option<i32>,
    pub course_id: Option<i32>,
    pub time: Option<NaiveTime>,
    pub day: Option<DayOfWeek>,
}

pub struct ClassRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> ClassRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Class>> {
        ClassEntity::find_by_id(id)
            .one(self.conn)
            .await?
            .map(Class::try_from)
            .transpose()
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        base::exists::<ClassEntity, _>(self.conn, id).await
    }

    pub async fn list(&self) -> AppResult<Vec<Class>> {
        ClassEntity::find()
            .order_by_asc(Column::Id)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Class::try_from)
            .collect()
    }

    pub async fn create(&self, fields: ClassFields) -> AppResult<Class> {
        let model = ActiveModel {
            id: NotSet,
            teacher_id: Set(fields.teacher_id),
            course_id: Set(fields.course_id),
            time: Set(fields.time),
            day: Set(fields.day.map(|d| d.to_string())),
            version: Set(1),
        }
        .insert(self.conn)
        .await?;
        Class::try_from(model)
    }

    pub async fn update(
        &self,
        current: &Class,
        fields: ClassFields,
        expected_version: Option<i32>,
    ) -> AppResult<Class> {
        let model = ActiveModel {
            id: Set(current.id),
            teacher_id: Set(fields.teacher_id),
            course_id: Set(fields.course_id),
            time: Set(fields.time),
            day: Set(fields.day.map(|d| d.to_string())),
            version: Set(next_version(current.version, expected_version)),
        };
        let model = update_versioned::<ClassEntity, _>(self.conn, model, expected_version).await?;
        Class::try_from(model)
    }

    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        base::delete_by_id::<ClassEntity, _>(self.conn, id).await
    }
}
