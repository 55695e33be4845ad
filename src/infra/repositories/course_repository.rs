use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::base::{self, next_version, update_versioned, Versioned};
use super::entities::class;
use super::entities::course::{ActiveModel, Column, Entity as CourseEntity};
use crate::domain::{Course, CourseInput};
use crate::errors::AppResult;

impl Versioned for CourseEntity {
    fn version_column() -> Column {
        Column::Version
    }
}

pub struct CourseRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> CourseRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Course>> {
        let model = CourseEntity::find_by_id(id).one(self.conn).await?;
        Ok(model.map(Course::from))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        base::exists::<CourseEntity, _>(self.conn, id).await
    }

    pub async fn list(&self) -> AppResult<Vec<Course>> {
        let models = CourseEntity::find()
            .order_by_asc(Column::Code)
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(Course::from).collect())
    }

    /// Whether another course already uses `code`.
    pub async fn code_taken(&self, code: &str, except_id: Option<i32>) -> AppResult<bool> {
        let mut query = CourseEntity::find().filter(Column::Code.eq(code));
        if let Some(id) = except_id {
            query = query.filter(Column::Id.ne(id));
        }
        Ok(query.count(self.conn).await? > 0)
    }

    pub async fn create(&self, input: &CourseInput) -> AppResult<Course> {
        let model = ActiveModel {
            id: NotSet,
            name: Set(input.name.clone()),
            code: Set(input.code.clone()),
            credits: Set(input.credits),
            version: Set(1),
        }
        .insert(self.conn)
        .await?;
        Ok(Course::from(model))
    }

    pub async fn update(&self, current: &Course, input: &CourseInput) -> AppResult<Course> {
        let model = ActiveModel {
            id: Set(current.id),
            name: Set(input.name.clone()),
            code: Set(input.code.clone()),
            credits: Set(input.credits),
            version: Set(next_version(current.version, input.version)),
        };
        let model = update_versioned::<CourseEntity, _>(self.conn, model, input.version).await?;
        Ok(Course::from(model))
    }

    pub async fn count_classes(&self, id: i32) -> AppResult<u64> {
        Ok(class::Entity::find()
            .filter(class::Column::CourseId.eq(id))
            .count(self.conn)
            .await?)
    }

    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        base::delete_by_id::<CourseEntity, _>(self.conn, id).await
    }
}
