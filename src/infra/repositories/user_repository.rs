//! Identity user persistence.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::domain::User;
use crate::errors::AppResult;

pub struct UserRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> UserRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let model = UserEntity::find_by_id(id).one(self.conn).await?;
        Ok(model.map(User::from))
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let model = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(self.conn)
            .await?;
        Ok(model.map(User::from))
    }

    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let model = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn)
            .await?;
        Ok(model.map(User::from))
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_asc(user::Column::Username)
            .all(self.conn)
            .await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    pub async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
    ) -> AppResult<User> {
        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            email: Set(email),
            password_hash: Set(password_hash),
            access_failed_count: Set(0),
            lockout_end: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.conn)
        .await?;

        Ok(User::from(model))
    }

    /// Persist the failed-login counter and lockout window.
    pub async fn set_lockout_state(
        &self,
        id: Uuid,
        access_failed_count: i32,
        lockout_end: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        ActiveModel {
            id: Set(id),
            access_failed_count: Set(access_failed_count),
            lockout_end: Set(lockout_end),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(self.conn)
        .await?;
        Ok(())
    }
}
