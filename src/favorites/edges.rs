use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, SqlErr,
};
use sea_orm::ActiveValue::NotSet;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    db::OrmConn,
    entity::favorites::{ActiveModel, Column, Entity as Favorites},
    models::Favorite,
};

use super::RecipeId;

#[derive(Debug, Error)]
pub enum EdgeError {
    /// The (user, recipe) pair already exists.
    #[error("favorite already exists")]
    UniqueViolation,

    #[error("remote call timed out after {0:?}")]
    Timeout(Duration),

    #[error("remote error: {0}")]
    Remote(String),
}

impl From<DbErr> for EdgeError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => EdgeError::UniqueViolation,
            _ => EdgeError::Remote(err.to_string()),
        }
    }
}

/// Access to the remote `favorites(user_id, recipe_id)` table.
#[async_trait]
pub trait FavoriteEdges: Send + Sync {
    /// Recipe ids of every edge owned by `user_id`.
    async fn select_by_user(&self, user_id: Uuid) -> Result<Vec<RecipeId>, EdgeError>;

    /// Insert one edge. Duplicates fail with [`EdgeError::UniqueViolation`].
    async fn insert(&self, user_id: Uuid, recipe_id: &str) -> Result<Favorite, EdgeError>;

    async fn delete(&self, user_id: Uuid, recipe_id: &str) -> Result<(), EdgeError>;
}

#[derive(Clone)]
pub struct SeaOrmFavoriteEdges {
    orm: OrmConn,
}

impl SeaOrmFavoriteEdges {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl FavoriteEdges for SeaOrmFavoriteEdges {
    async fn select_by_user(&self, user_id: Uuid) -> Result<Vec<RecipeId>, EdgeError> {
        let ids = Favorites::find()
            .select_only()
            .column(Column::RecipeId)
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::CreatedAt)
            .into_tuple::<String>()
            .all(&self.orm)
            .await?;
        Ok(ids)
    }

    async fn insert(&self, user_id: Uuid, recipe_id: &str) -> Result<Favorite, EdgeError> {
        let active = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            recipe_id: Set(recipe_id.to_string()),
            created_at: NotSet,
        };
        let model = active.insert(&self.orm).await?;
        Ok(model.into())
    }

    async fn delete(&self, user_id: Uuid, recipe_id: &str) -> Result<(), EdgeError> {
        let result = Favorites::delete_many()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::RecipeId.eq(recipe_id))
            .exec(&self.orm)
            .await?;
        if result.rows_affected == 0 {
            tracing::debug!(%user_id, recipe_id, "delete matched no favorite");
        }
        Ok(())
    }
}
