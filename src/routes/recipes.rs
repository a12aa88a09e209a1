use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::recipes::{
        BulkApprovalRequest, BulkApprovalResponse, CreateRecipeRequest, RecipeList,
        UpdateRecipeRequest,
    },
    dto::reviews::{ReviewList, SubmitReviewRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CrazyRecipe, RecipeReview, RecipeStats},
    response::ApiResponse,
    routes::params::{AuthorRecipesQuery, RecipeQuery, StatsQuery},
    services::{recipe_service, review_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route("/stats", get(recipe_stats))
        .route("/approval", post(bulk_update_approval))
        .route("/by-author/{author_id}", get(list_by_author))
        .route("/by-author-name/{author_name}", get(list_by_author_name))
        .route(
            "/{id}",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/{id}/approve", post(approve_recipe))
        .route("/{id}/views", post(increment_views))
        .route("/{id}/reviews", get(list_reviews).post(submit_review))
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    params(RecipeQuery),
    responses(
        (status = 200, description = "List recipes", body = ApiResponse<RecipeList>)
    ),
    tag = "Recipes"
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<RecipeQuery>,
) -> AppResult<Json<ApiResponse<RecipeList>>> {
    let resp = recipe_service::list_recipes(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes",
    request_body = CreateRecipeRequest,
    responses(
        (status = 201, description = "Create recipe", body = ApiResponse<CrazyRecipe>),
        (status = 400, description = "Invalid recipe")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRecipeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<CrazyRecipe>>)> {
    let resp = recipe_service::create_recipe(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Get recipe", body = ApiResponse<CrazyRecipe>),
        (status = 404, description = "Recipe not found")
    ),
    tag = "Recipes"
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CrazyRecipe>>> {
    let resp = recipe_service::get_recipe(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = UpdateRecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = ApiResponse<CrazyRecipe>),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRecipeRequest>,
) -> AppResult<Json<ApiResponse<CrazyRecipe>>> {
    let resp = recipe_service::update_recipe(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Deleted recipe"),
        (status = 403, description = "Not the author"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = recipe_service::delete_recipe(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/approve",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Approved recipe", body = ApiResponse<CrazyRecipe>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn approve_recipe(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CrazyRecipe>>> {
    let resp = recipe_service::approve_recipe(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes/approval",
    request_body = BulkApprovalRequest,
    responses(
        (status = 200, description = "Approval updated", body = ApiResponse<BulkApprovalResponse>),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Recipes"
)]
pub async fn bulk_update_approval(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<BulkApprovalRequest>,
) -> AppResult<Json<ApiResponse<BulkApprovalResponse>>> {
    let resp = recipe_service::bulk_update_approval(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/views",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 204, description = "View recorded")
    ),
    tag = "Recipes"
)]
pub async fn increment_views(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    recipe_service::increment_views(&state, id).await;
    StatusCode::NO_CONTENT
}

#[utoipa::path(
    get,
    path = "/api/recipes/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Recipe stats", body = ApiResponse<RecipeStats>)
    ),
    tag = "Recipes"
)]
pub async fn recipe_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<ApiResponse<RecipeStats>>> {
    let resp = recipe_service::recipe_stats(&state, query.author_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recipes/by-author/{author_id}",
    params(
        ("author_id" = Uuid, Path, description = "Author user ID"),
        AuthorRecipesQuery
    ),
    responses(
        (status = 200, description = "Recipes by author", body = ApiResponse<RecipeList>)
    ),
    tag = "Recipes"
)]
pub async fn list_by_author(
    State(state): State<AppState>,
    user: Option<AuthUser>,
    Path(author_id): Path<Uuid>,
    Query(query): Query<AuthorRecipesQuery>,
) -> AppResult<Json<ApiResponse<RecipeList>>> {
    let include_unapproved = query.include_unapproved.unwrap_or(false);
    // Unapproved drafts are visible to their author and to admins only.
    if include_unapproved {
        match &user {
            Some(u) if u.user_id == author_id || u.is_admin() => {}
            Some(_) => return Err(AppError::Forbidden),
            None => return Err(AppError::Unauthorized),
        }
    }
    let resp = recipe_service::list_by_author(&state, author_id, include_unapproved).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recipes/by-author-name/{author_name}",
    params(
        ("author_name" = String, Path, description = "Author display name")
    ),
    responses(
        (status = 200, description = "Recipes by author name", body = ApiResponse<RecipeList>)
    ),
    tag = "Recipes"
)]
pub async fn list_by_author_name(
    State(state): State<AppState>,
    Path(author_name): Path<String>,
) -> AppResult<Json<ApiResponse<RecipeList>>> {
    let resp = recipe_service::list_by_author_name(&state, &author_name).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/reviews",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Reviews of a recipe", body = ApiResponse<ReviewList>)
    ),
    tag = "Reviews"
)]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ReviewList>>> {
    let resp = review_service::list_reviews(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/reviews",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = SubmitReviewRequest,
    responses(
        (status = 201, description = "Review submitted", body = ApiResponse<RecipeReview>),
        (status = 400, description = "Invalid review"),
        (status = 404, description = "Recipe not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn submit_review(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitReviewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<RecipeReview>>)> {
    let resp = review_service::submit_review(&state, &user, id, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
