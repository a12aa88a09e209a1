use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::favorites::Notice;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ToggleFavoriteRequest {
    pub recipe_id: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleFavoriteResponse {
    pub recipe_id: String,
    pub accepted: bool,
    pub is_favorite: bool,
    pub notice: Notice,
    pub title: String,
    pub description: String,
    pub is_error: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FavoriteStatus {
    pub recipe_id: String,
    pub is_favorite: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FavoriteIdList {
    #[schema(value_type = Vec<String>)]
    pub items: Vec<String>,
}
