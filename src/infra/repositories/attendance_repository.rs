use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};

use super::base::{self, next_version, update_versioned, Versioned};
use super::entities::attendance::{ActiveModel, Column, Entity as AttendanceEntity};
use crate::domain::{Attendance, AttendanceStatus};
use crate::errors::AppResult;

impl Versioned for AttendanceEntity {
    fn version_column() -> Column {
        Column::Version
    }
}

/// Validated attendance columns
#[derive(Debug, Clone)]
pub struct AttendanceFields {
    pub student_id: i32,
    pub class_id: i32,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

pub struct AttendanceRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> AttendanceRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Attendance>> {
        AttendanceEntity::find_by_id(id)
            .one(self.conn)
            .await?
            .map(Attendance::try_from)
            .transpose()
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        base::exists::<AttendanceEntity, _>(self.conn, id).await
    }

    /// All records, newest date first
    pub async fn list(&self) -> AppResult<Vec<Attendance>> {
        AttendanceEntity::find()
            .order_by_desc(Column::Date)
            .order_by_asc(Column::Id)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Attendance::try_from)
            .collect()
    }

    pub async fn list_for_student(&self, student_id: i32) -> AppResult<Vec<Attendance>> {
        AttendanceEntity::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Date)
            .all(self.conn)
            .await?
            .into_iter()
            .map(Attendance::try_from)
            .collect()
    }

    pub async fn create(&self, fields: AttendanceFields) -> AppResult<Attendance> {
        let model = ActiveModel {
            id: NotSet,
            student_id: Set(fields.student_id),
            class_id: Set(fields.class_id),
            date: Set(fields.date),
            status: Set(fields.status.to_string()),
            version: Set(1),
        }
        .insert(self.conn)
        .await?;
        Attendance::try_from(model)
    }

    pub async fn update(
        &self,
        current: &Attendance,
        fields: AttendanceFields,
        expected_version: Option<i32>,
    ) -> AppResult<Attendance> {
        let model = ActiveModel {
            id: Set(current.id),
            student_id: Set(fields.student_id),
            class_id: Set(fields.class_id),
            date: Set(fields.date),
            status: Set(fields.status.to_string()),
            version: Set(next_version(current.version, expected_version)),
        };
        let model =
            update_versioned::<AttendanceEntity, _>(self.conn, model, expected_version).await?;
        Attendance::try_from(model)
    }

    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        base::delete_by_id::<AttendanceEntity, _>(self.conn, id).await
    }
}
