//! Shared repository plumbing.
//!
//! Repositories are generic over [`ConnectionTrait`] so the same code runs
//! against the pool and inside a transaction.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, PrimaryKeyTrait, QueryFilter,
};

use crate::errors::AppResult;

/// Entity carrying an optimistic concurrency token.
pub trait Versioned: EntityTrait {
    fn version_column() -> Self::Column;
}

/// Next token value for an update of a row currently at `current`.
pub fn next_version(current: i32, expected: Option<i32>) -> i32 {
    expected.unwrap_or(current) + 1
}

/// Run an UPDATE, filtered on the concurrency token when one is supplied.
///
/// A zero-row update surfaces as `DbErr::RecordNotUpdated`.
pub async fn update_versioned<E, C>(
    conn: &C,
    model: E::ActiveModel,
    expected_version: Option<i32>,
) -> AppResult<E::Model>
where
    E: Versioned,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    C: ConnectionTrait,
{
    let mut update = E::update(model);
    if let Some(version) = expected_version {
        update = update.filter(E::version_column().eq(version));
    }
    update.exec(conn).await.map_err(Into::into)
}

/// Delete by primary key; returns whether a row was removed.
pub async fn delete_by_id<E, C>(
    conn: &C,
    id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType,
) -> AppResult<bool>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let result = E::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}

/// Whether a row with this primary key exists.
pub async fn exists<E, C>(conn: &C, id: <E::PrimaryKey as PrimaryKeyTrait>::ValueType) -> AppResult<bool>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    Ok(E::find_by_id(id).one(conn).await?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_version_prefers_expected() {
        assert_eq!(next_version(3, None), 4);
        assert_eq!(next_version(3, Some(2)), 3);
    }
}
