use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{DeletedAccount, LoginRequest, LoginResponse, RegisterRequest},
        favorites::{FavoriteIdList, FavoriteStatus, ToggleFavoriteRequest, ToggleFavoriteResponse},
        recipes::{
            BulkApprovalRequest, BulkApprovalResponse, CreateRecipeRequest, RecipeList,
            UpdateRecipeRequest,
        },
        reviews::{ReviewList, SubmitReviewRequest},
    },
    favorites::Notice,
    models::{CrazyRecipe, Favorite, RecipeReview, RecipeStats, User},
    response::{ApiResponse, Meta},
    routes::{auth, favorites, health, params, recipes, reviews},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        auth::login,
        auth::register,
        auth::delete_me,
        recipes::list_recipes,
        recipes::create_recipe,
        recipes::get_recipe,
        recipes::update_recipe,
        recipes::delete_recipe,
        recipes::approve_recipe,
        recipes::bulk_update_approval,
        recipes::increment_views,
        recipes::recipe_stats,
        recipes::list_by_author,
        recipes::list_by_author_name,
        recipes::list_reviews,
        recipes::submit_review,
        reviews::reviews_by_reviewers,
        favorites::list_favorites,
        favorites::favorite_status,
        favorites::toggle_favorite
    ),
    components(
        schemas(
            User,
            CrazyRecipe,
            RecipeReview,
            RecipeStats,
            Favorite,
            Notice,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            DeletedAccount,
            CreateRecipeRequest,
            UpdateRecipeRequest,
            BulkApprovalRequest,
            BulkApprovalResponse,
            SubmitReviewRequest,
            ToggleFavoriteRequest,
            ToggleFavoriteResponse,
            FavoriteStatus,
            FavoriteIdList,
            RecipeList,
            ReviewList,
            params::Pagination,
            params::RecipeQuery,
            params::RecipeFilterType,
            params::RecipeSortBy,
            params::DeleteAccountQuery,
            Meta,
            ApiResponse<CrazyRecipe>,
            ApiResponse<RecipeList>,
            ApiResponse<ReviewList>,
            ApiResponse<FavoriteIdList>,
            ApiResponse<ToggleFavoriteResponse>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Recipes", description = "Crazy recipe endpoints"),
        (name = "Reviews", description = "Recipe review endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
