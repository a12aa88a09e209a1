use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::reviews::{ReviewList, SubmitReviewRequest},
    entity::crazy_recipe_reviews::{ActiveModel, Column, Entity as Reviews},
    entity::crazy_recipes::Entity as CrazyRecipes,
    entity::users::Entity as Users,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{RecipeReview, User},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

pub async fn list_reviews(state: &AppState, recipe_id: Uuid) -> AppResult<ApiResponse<ReviewList>> {
    let items: Vec<RecipeReview> = Reviews::find()
        .filter(Column::RecipeId.eq(recipe_id))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(RecipeReview::from)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Reviews", ReviewList { items }, Some(meta)))
}

pub async fn reviews_by_reviewers(
    state: &AppState,
    reviewer_names: Vec<String>,
) -> AppResult<ApiResponse<ReviewList>> {
    if reviewer_names.is_empty() {
        return Ok(ApiResponse::success(
            "Reviews",
            ReviewList { items: Vec::new() },
            Some(Meta::total(0)),
        ));
    }

    let items: Vec<RecipeReview> = Reviews::find()
        .filter(Column::ReviewerName.is_in(reviewer_names))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(RecipeReview::from)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Reviews", ReviewList { items }, Some(meta)))
}

/// Checks rating bounds and trims the comment.
pub fn validate_review(payload: &SubmitReviewRequest) -> AppResult<String> {
    if !(MIN_RATING..=MAX_RATING).contains(&payload.rating) {
        return Err(AppError::BadRequest(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    let comment = payload.comment.trim();
    if comment.is_empty() {
        return Err(AppError::BadRequest("comment is required".into()));
    }
    Ok(comment.to_string())
}

pub async fn submit_review(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
    payload: SubmitReviewRequest,
) -> AppResult<ApiResponse<RecipeReview>> {
    let comment = validate_review(&payload)?;

    CrazyRecipes::find_by_id(recipe_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let reviewer_name = match payload
        .reviewer_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    {
        Some(name) => name.to_string(),
        None => {
            let reviewer: User = Users::find_by_id(user.user_id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::Unauthorized)?
                .into();
            reviewer.display_name()
        }
    };

    let review = ActiveModel {
        id: Set(Uuid::new_v4()),
        recipe_id: Set(recipe_id),
        reviewer_id: Set(user.user_id),
        reviewer_name: Set(reviewer_name),
        rating: Set(payload.rating),
        comment: Set(comment),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::ReviewSubmit,
        serde_json::json!({ "recipe_id": recipe_id, "review_id": review.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Review submitted",
        RecipeReview::from(review),
        Some(Meta::empty()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: i16, comment: &str) -> SubmitReviewRequest {
        SubmitReviewRequest {
            rating,
            comment: comment.into(),
            reviewer_name: None,
        }
    }

    #[test]
    fn rating_must_be_in_range() {
        assert!(validate_review(&review(0, "meh")).is_err());
        assert!(validate_review(&review(6, "wow")).is_err());
        assert!(validate_review(&review(1, "ok")).is_ok());
        assert!(validate_review(&review(5, "great")).is_ok());
    }

    #[test]
    fn comment_is_trimmed_and_required() {
        assert_eq!(
            validate_review(&review(4, "  tasty  ")).expect("valid"),
            "tasty"
        );
        assert!(validate_review(&review(4, "   ")).is_err());
    }
}
