use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::base::{self, next_version, update_versioned, Versioned};
use super::entities::enrollment::{ActiveModel, Column, Entity as EnrollmentEntity};
use crate::domain::{Enrollment, EnrollmentInput};
use crate::errors::AppResult;

impl Versioned for EnrollmentEntity {
    fn version_column() -> Column {
        Column::Version
    }
}

pub struct EnrollmentRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> EnrollmentRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Enrollment>> {
        let model = EnrollmentEntity::find_by_id(id).one(self.conn).await?;
        Ok(model.map(Enrollment::from))
    }

    pub async fn list(&self) -> AppResult<Vec<Enrollment>> {
        let models = EnrollmentEntity::find()
            .order_by_asc(Column::Id)
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(Enrollment::from).collect())
    }

    pub async fn find_pair(&self, student_id: i32, class_id: i32) -> AppResult<Option<Enrollment>> {
        let model = EnrollmentEntity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ClassId.eq(class_id))
            .one(self.conn)
            .await?;
        Ok(model.map(Enrollment::from))
    }

    /// Whether an enrollment other than `except_id` covers the pair.
    pub async fn pair_taken(
        &self,
        student_id: i32,
        class_id: i32,
        except_id: Option<i32>,
    ) -> AppResult<bool> {
        let mut query = EnrollmentEntity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ClassId.eq(class_id));
        if let Some(id) = except_id {
            query = query.filter(Column::Id.ne(id));
        }
        Ok(query.count(self.conn).await? > 0)
    }

    /// Ids of the students enrolled in a class
    pub async fn student_ids_for_class(&self, class_id: i32) -> AppResult<Vec<i32>> {
        Ok(EnrollmentEntity::find()
            .select_only()
            .column(Column::StudentId)
            .filter(Column::ClassId.eq(class_id))
            .into_tuple::<i32>()
            .all(self.conn)
            .await?)
    }

    pub async fn create(
        &self,
        student_id: i32,
        class_id: i32,
        grade: Option<String>,
    ) -> AppResult<Enrollment> {
        let model = ActiveModel {
            id: NotSet,
            student_id: Set(student_id),
            class_id: Set(class_id),
            grade: Set(grade),
            version: Set(1),
        }
        .insert(self.conn)
        .await?;
        Ok(Enrollment::from(model))
    }

    pub async fn update(
        &self,
        current: &Enrollment,
        input: &EnrollmentInput,
    ) -> AppResult<Enrollment> {
        let model = ActiveModel {
            id: Set(current.id),
            student_id: Set(input.student_id),
            class_id: Set(input.class_id),
            grade: Set(input.grade.clone()),
            version: Set(next_version(current.version, input.version)),
        };
        let model =
            update_versioned::<EnrollmentEntity, _>(self.conn, model, input.version).await?;
        Ok(Enrollment::from(model))
    }

    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        base::delete_by_id::<EnrollmentEntity, _>(self.conn, id).await
    }

    /// Remove the pair's enrollment; returns how many rows went.
    pub async fn delete_pair(&self, student_id: i32, class_id: i32) -> AppResult<u64> {
        let result = EnrollmentEntity::delete_many()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ClassId.eq(class_id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }
}
