use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::base::{self, next_version, update_versioned, Versioned};
use super::entities::class;
use super::entities::teacher::{ActiveModel, Column, Entity as TeacherEntity};
use crate::domain::{Teacher, TeacherInput};
use crate::errors::AppResult;

impl Versioned for TeacherEntity {
    fn version_column() -> Column {
        Column::Version
    }
}

pub struct TeacherRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> TeacherRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Teacher>> {
        let model = TeacherEntity::find_by_id(id).one(self.conn).await?;
        Ok(model.map(Teacher::from))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        base::exists::<TeacherEntity, _>(self.conn, id).await
    }

    pub async fn list(&self) -> AppResult<Vec<Teacher>> {
        let models = TeacherEntity::find()
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id)
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(Teacher::from).collect())
    }

    pub async fn create(&self, input: &TeacherInput) -> AppResult<Teacher> {
        let model = ActiveModel {
            id: NotSet,
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            version: Set(1),
        }
        .insert(self.conn)
        .await?;
        Ok(Teacher::from(model))
    }

    pub async fn update(&self, current: &Teacher, input: &TeacherInput) -> AppResult<Teacher> {
        let model = ActiveModel {
            id: Set(current.id),
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            version: Set(next_version(current.version, input.version)),
        };
        let model = update_versioned::<TeacherEntity, _>(self.conn, model, input.version).await?;
        Ok(Teacher::from(model))
    }

    /// Classes this teacher is assigned to
    pub async fn count_classes(&self, id: i32) -> AppResult<u64> {
        Ok(class::Entity::find()
            .filter(class::Column::TeacherId.eq(id))
            .count(self.conn)
            .await?)
    }

    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        base::delete_by_id::<TeacherEntity, _>(self.conn, id).await
    }
}
