use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, QueryOrder, Set};

use super::base::{self, next_version, update_versioned, Versioned};
use super::entities::student::{ActiveModel, Column, Entity as StudentEntity};
use crate::domain::{Student, StudentInput};
use crate::errors::AppResult;

impl Versioned for StudentEntity {
    fn version_column() -> Column {
        Column::Version
    }
}

pub struct StudentRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> StudentRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Student>> {
        let model = StudentEntity::find_by_id(id).one(self.conn).await?;
        Ok(model.map(Student::from))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        base::exists::<StudentEntity, _>(self.conn, id).await
    }

    /// All students ordered by last then first name
    pub async fn list(&self) -> AppResult<Vec<Student>> {
        let models = StudentEntity::find()
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id)
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(Student::from).collect())
    }

    pub async fn create(&self, input: &StudentInput) -> AppResult<Student> {
        let model = ActiveModel {
            id: NotSet,
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            date_of_birth: Set(input.date_of_birth),
            version: Set(1),
        }
        .insert(self.conn)
        .await?;
        Ok(Student::from(model))
    }

    pub async fn update(&self, current: &Student, input: &StudentInput) -> AppResult<Student> {
        let model = ActiveModel {
            id: Set(current.id),
            first_name: Set(input.first_name.clone()),
            last_name: Set(input.last_name.clone()),
            date_of_birth: Set(input.date_of_birth),
            version: Set(next_version(current.version, input.version)),
        };
        let model = update_versioned::<StudentEntity, _>(self.conn, model, input.version).await?;
        Ok(Student::from(model))
    }

    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        base::delete_by_id::<StudentEntity, _>(self.conn, id).await
    }
}
