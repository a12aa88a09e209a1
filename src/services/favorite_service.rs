use std::sync::Arc;

use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::favorites::{FavoriteIdList, FavoriteStatus, ToggleFavoriteResponse},
    error::{AppError, AppResult},
    favorites::{FavoritesStore, Notice, SeaOrmFavoriteEdges, ToggleOutcome},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::recipe_service,
    state::AppState,
};

/// A store for the request's principal, loaded from the database.
///
/// A failed load is an error here: an empty set would read as "no favorites".
pub async fn load_store(state: &AppState, user: Option<&AuthUser>) -> AppResult<FavoritesStore> {
    let edges = Arc::new(SeaOrmFavoriteEdges::new(state.orm.clone()));
    let store =
        FavoritesStore::try_load(edges, user.map(|u| u.user_id), state.favorites_timeout).await?;
    Ok(store)
}

fn validate_recipe_id(recipe_id: &str) -> AppResult<&str> {
    let recipe_id = recipe_id.trim();
    if recipe_id.is_empty() {
        return Err(AppError::BadRequest("recipe_id is required".into()));
    }
    Ok(recipe_id)
}

pub async fn list_favorites(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<FavoriteIdList>> {
    let store = load_store(state, Some(user)).await?;
    let items = store.favorites().await;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("OK", FavoriteIdList { items }, Some(meta)))
}

pub async fn favorite_status(
    state: &AppState,
    user: &AuthUser,
    recipe_id: &str,
) -> AppResult<ApiResponse<FavoriteStatus>> {
    let recipe_id = validate_recipe_id(recipe_id)?;
    let store = load_store(state, Some(user)).await?;
    let is_favorite = store.is_favorite(recipe_id).await;
    Ok(ApiResponse::success(
        "OK",
        FavoriteStatus {
            recipe_id: recipe_id.to_string(),
            is_favorite,
        },
        None,
    ))
}

pub async fn toggle_favorite(
    state: &AppState,
    user: Option<&AuthUser>,
    recipe_id: &str,
) -> AppResult<ApiResponse<ToggleFavoriteResponse>> {
    let recipe_id = validate_recipe_id(recipe_id)?;
    let store = load_store(state, user).await?;
    let ToggleOutcome { accepted, notice } = store.toggle(recipe_id).await;
    let is_favorite = store.is_favorite(recipe_id).await;

    if let Some(user) = user {
        after_toggle(state, user.user_id, recipe_id, notice).await;
    }

    let data = ToggleFavoriteResponse {
        recipe_id: recipe_id.to_string(),
        accepted,
        is_favorite,
        notice,
        title: notice.title().to_string(),
        description: notice.description().to_string(),
        is_error: notice.is_error(),
    };
    if notice.is_error() {
        return Ok(ApiResponse::failure(notice.title(), data));
    }
    Ok(ApiResponse::success(notice.title(), data, Some(Meta::empty())))
}

/// Audit the change and keep `likes_count` of crazy recipes in step.
async fn after_toggle(state: &AppState, user_id: Uuid, recipe_id: &str, notice: Notice) {
    let action = match notice {
        Notice::Added => AuditAction::FavoriteAdd,
        Notice::Removed => AuditAction::FavoriteRemove,
        _ => return,
    };

    audit::record(
        &state.pool,
        Some(user_id),
        action,
        serde_json::json!({ "recipe_id": recipe_id }),
    )
    .await;

    // Static catalogue ids are not uuids and have no counters.
    if let Ok(id) = Uuid::parse_str(recipe_id) {
        match action {
            AuditAction::FavoriteAdd => recipe_service::increment_likes(state, id).await,
            _ => recipe_service::decrement_likes(state, id).await,
        }
    }
}
