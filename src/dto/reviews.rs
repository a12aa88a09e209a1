use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::RecipeReview;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitReviewRequest {
    pub rating: i16,
    pub comment: String,
    /// Defaults to the reviewer's username or email prefix.
    pub reviewer_name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ReviewList {
    #[schema(value_type = Vec<RecipeReview>)]
    pub items: Vec<RecipeReview>,
}
