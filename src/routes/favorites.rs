use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::favorites::{FavoriteIdList, FavoriteStatus, ToggleFavoriteRequest, ToggleFavoriteResponse},
    error::AppResult,
    favorites::Notice,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::favorite_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites))
        .route("/toggle", post(toggle_favorite))
        .route("/{recipe_id}", get(favorite_status))
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "Favorite recipe ids of the caller", body = ApiResponse<FavoriteIdList>),
        (status = 503, description = "Favorites could not be loaded")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<FavoriteIdList>>> {
    let resp = favorite_service::list_favorites(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/favorites/{recipe_id}",
    params(
        ("recipe_id" = String, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Whether the recipe is a favorite", body = ApiResponse<FavoriteStatus>),
        (status = 503, description = "Favorites could not be loaded")
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn favorite_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(recipe_id): Path<String>,
) -> AppResult<Json<ApiResponse<FavoriteStatus>>> {
    let resp = favorite_service::favorite_status(&state, &user, &recipe_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/favorites/toggle",
    request_body = ToggleFavoriteRequest,
    responses(
        (status = 200, description = "Toggle accepted", body = ApiResponse<ToggleFavoriteResponse>),
        (status = 401, description = "Sign in required", body = ApiResponse<ToggleFavoriteResponse>),
        (status = 503, description = "Favorites store unavailable", body = ApiResponse<ToggleFavoriteResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Json(payload): Json<ToggleFavoriteRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ToggleFavoriteResponse>>)> {
    let resp = favorite_service::toggle_favorite(&state, user.as_ref(), &payload.recipe_id).await?;
    let status = resp
        .data
        .as_ref()
        .map(|data| toggle_status(data.notice))
        .unwrap_or(StatusCode::OK);
    Ok((status, Json(resp)))
}

fn toggle_status(notice: Notice) -> StatusCode {
    match notice {
        Notice::SignInRequired => StatusCode::UNAUTHORIZED,
        Notice::Failed => StatusCode::SERVICE_UNAVAILABLE,
        Notice::Added | Notice::Removed | Notice::AlreadyFavorite => StatusCode::OK,
    }
}
