//! Roles and user/role assignments.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use sea_orm::sea_query::JoinType;
use uuid::Uuid;

use super::entities::corrupt;
use super::entities::role::{self, Entity as RoleEntity};
use super::entities::user_role::{self, Entity as UserRoleEntity};
use crate::domain::Role;
use crate::errors::AppResult;

pub use super::entities::role::Model as RoleRecord;

pub struct RoleRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> RoleRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<RoleRecord>> {
        Ok(RoleEntity::find()
            .filter(role::Column::Name.eq(name))
            .one(self.conn)
            .await?)
    }

    /// Look a role up by name, creating it when missing.
    pub async fn ensure(&self, name: &str) -> AppResult<(RoleRecord, bool)> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok((existing, false));
        }
        let created = role::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        }
        .insert(self.conn)
        .await?;
        Ok((created, true))
    }

    pub async fn delete(&self, name: &str) -> AppResult<u64> {
        let result = RoleEntity::delete_many()
            .filter(role::Column::Name.eq(name))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Roles held by one user, ordered by name.
    pub async fn roles_for_user(&self, user_id: Uuid) -> AppResult<Vec<Role>> {
        let records = RoleEntity::find()
            .join(JoinType::InnerJoin, role::Relation::UserRoles.def())
            .filter(user_role::Column::UserId.eq(user_id))
            .order_by_asc(role::Column::Name)
            .all(self.conn)
            .await?;
        records.into_iter().map(parse_role).collect()
    }

    /// Every assignment, grouped by user.
    pub async fn roles_by_user(&self) -> AppResult<HashMap<Uuid, Vec<Role>>> {
        let rows = UserRoleEntity::find()
            .find_also_related(RoleEntity)
            .all(self.conn)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<Role>> = HashMap::new();
        for (assignment, record) in rows {
            if let Some(record) = record {
                grouped
                    .entry(assignment.user_id)
                    .or_default()
                    .push(parse_role(record)?);
            }
        }
        for roles in grouped.values_mut() {
            roles.sort();
        }
        Ok(grouped)
    }

    /// Remove every role from a user; returns how many were removed.
    pub async fn remove_all_for_user(&self, user_id: Uuid) -> AppResult<u64> {
        let result = UserRoleEntity::delete_many()
            .filter(user_role::Column::UserId.eq(user_id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn add_to_user(&self, user_id: Uuid, role_id: i32) -> AppResult<()> {
        UserRoleEntity::insert(user_role::ActiveModel {
            user_id: Set(user_id),
            role_id: Set(role_id),
        })
        .exec_without_returning(self.conn)
        .await?;
        Ok(())
    }
}

fn parse_role(record: RoleRecord) -> AppResult<Role> {
    record
        .name
        .parse()
        .map_err(|e| corrupt("roles", record.id, e))
}
