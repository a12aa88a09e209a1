use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{crazy_recipe_reviews, crazy_recipes, favorites, users};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub role: String,
}

impl User {
    /// Name shown next to content the user authors.
    pub fn display_name(&self) -> String {
        match self.username.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or(&self.email)
                .to_string(),
        }
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            username: model.username,
            created_at: model.created_at.with_timezone(&Utc),
            role: model.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CrazyRecipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub cooking_time: i32,
    pub is_veg: bool,
    pub image_url: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_email: String,
    pub views_count: i32,
    pub likes_count: i32,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CrazyRecipe {
    pub fn is_owned_by(&self, user_id: Option<Uuid>) -> bool {
        user_id.is_some_and(|id| id == self.author_id)
    }
}

impl From<crazy_recipes::Model> for CrazyRecipe {
    fn from(model: crazy_recipes::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            ingredients: model.ingredients,
            instructions: model.instructions,
            cooking_time: model.cooking_time,
            is_veg: model.is_veg,
            image_url: model.image_url,
            author_id: model.author_id,
            author_name: model.author_name,
            author_email: model.author_email,
            views_count: model.views_count,
            likes_count: model.likes_count,
            is_approved: model.is_approved,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeReview {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewer_name: String,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<crazy_recipe_reviews::Model> for RecipeReview {
    fn from(model: crazy_recipe_reviews::Model) -> Self {
        Self {
            id: model.id,
            recipe_id: model.recipe_id,
            reviewer_id: model.reviewer_id,
            reviewer_name: model.reviewer_name,
            rating: model.rating,
            comment: model.comment,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// A single "user U has favorited recipe R" edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<favorites::Model> for Favorite {
    fn from(model: favorites::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            recipe_id: model.recipe_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeStats {
    pub total: i64,
    pub approved: i64,
    pub user_recipes: i64,
}
