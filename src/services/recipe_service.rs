use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit::{self, AuditAction},
    dto::recipes::{
        BulkApprovalRequest, BulkApprovalResponse, CreateRecipeRequest, RecipeList,
        UpdateRecipeRequest,
    },
    entity::crazy_recipes::{ActiveModel, Column, Entity as CrazyRecipes},
    entity::users::Entity as Users,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_owner_or_admin},
    models::{CrazyRecipe, RecipeStats, User},
    response::{ApiResponse, Meta},
    routes::params::{RecipeQuery, RecipeSortBy},
    state::AppState,
};

pub async fn list_recipes(
    state: &AppState,
    query: RecipeQuery,
) -> AppResult<ApiResponse<RecipeList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if query.approved_only.unwrap_or(true) {
        condition = condition.add(Column::IsApproved.eq(true));
    }

    if let Some(is_veg) = query.filter_type.unwrap_or_default().is_veg() {
        condition = condition.add(Column::IsVeg.eq(is_veg));
    }

    if let Some(search) = query.search_term() {
        condition = condition.add(search_condition(search));
    }

    let sort_col = match query.sort_by.unwrap_or_default() {
        RecipeSortBy::Newest => Column::CreatedAt,
        RecipeSortBy::Popular => Column::LikesCount,
        RecipeSortBy::Views => Column::ViewsCount,
    };

    let finder = CrazyRecipes::find()
        .filter(condition)
        .order_by_desc(sort_col)
        .order_by_desc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(CrazyRecipe::from)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Recipes", RecipeList { items }, Some(meta)))
}

/// Case-insensitive substring match on title or description.
fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(term));
    Condition::any()
        .add(Expr::col(Column::Title).ilike(pattern.clone()))
        .add(Expr::col(Column::Description).ilike(pattern))
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub async fn find_recipe(state: &AppState, id: Uuid) -> AppResult<Option<CrazyRecipe>> {
    let recipe = CrazyRecipes::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(CrazyRecipe::from);
    Ok(recipe)
}

pub async fn get_recipe(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CrazyRecipe>> {
    let recipe = find_recipe(state, id).await?.ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Recipe", recipe, None))
}

pub async fn list_by_author(
    state: &AppState,
    author_id: Uuid,
    include_unapproved: bool,
) -> AppResult<ApiResponse<RecipeList>> {
    let mut finder = CrazyRecipes::find().filter(Column::AuthorId.eq(author_id));
    if !include_unapproved {
        finder = finder.filter(Column::IsApproved.eq(true));
    }
    let items: Vec<CrazyRecipe> = finder
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(CrazyRecipe::from)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Recipes", RecipeList { items }, Some(meta)))
}

pub async fn list_by_author_name(
    state: &AppState,
    author_name: &str,
) -> AppResult<ApiResponse<RecipeList>> {
    let items: Vec<CrazyRecipe> = CrazyRecipes::find()
        .filter(Column::AuthorName.eq(author_name))
        .order_by_desc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(CrazyRecipe::from)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Recipes", RecipeList { items }, Some(meta)))
}

pub async fn create_recipe(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRecipeRequest,
) -> AppResult<ApiResponse<CrazyRecipe>> {
    let payload = payload.validate()?;
    let author: User = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::Unauthorized)?
        .into();

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(payload.title),
        description: Set(payload.description),
        ingredients: Set(payload.ingredients),
        instructions: Set(payload.instructions),
        cooking_time: Set(payload.cooking_time),
        is_veg: Set(payload.is_veg),
        image_url: Set(payload.image_url),
        author_id: Set(author.id),
        author_name: Set(author.display_name()),
        author_email: Set(author.email.clone()),
        views_count: Set(0),
        likes_count: Set(0),
        is_approved: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let recipe = active.insert(&state.orm).await?;
    tracing::info!(recipe_id = %recipe.id, author_id = %author.id, "recipe created");

    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::RecipeCreate,
        serde_json::json!({ "recipe_id": recipe.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Recipe created",
        CrazyRecipe::from(recipe),
        Some(Meta::empty()),
    ))
}

pub async fn update_recipe(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRecipeRequest,
) -> AppResult<ApiResponse<CrazyRecipe>> {
    let payload = payload.validate()?;
    let existing = CrazyRecipes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_owner_or_admin(user, existing.author_id)?;

    let mut active: ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(ingredients) = payload.ingredients {
        active.ingredients = Set(ingredients);
    }
    if let Some(instructions) = payload.instructions {
        active.instructions = Set(instructions);
    }
    if let Some(cooking_time) = payload.cooking_time {
        active.cooking_time = Set(cooking_time);
    }
    if let Some(is_veg) = payload.is_veg {
        active.is_veg = Set(is_veg);
    }
    if let Some(image_url) = payload.image_url {
        let image_url = image_url.trim().to_string();
        active.image_url = Set((!image_url.is_empty()).then_some(image_url));
    }
    active.updated_at = Set(Utc::now().into());

    let recipe = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::RecipeUpdate,
        serde_json::json!({ "recipe_id": recipe.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        CrazyRecipe::from(recipe),
        Some(Meta::empty()),
    ))
}

pub async fn delete_recipe(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = CrazyRecipes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_owner_or_admin(user, existing.author_id)?;

    let result = CrazyRecipes::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::RecipeDelete,
        serde_json::json!({ "recipe_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn approve_recipe(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<CrazyRecipe>> {
    ensure_admin(user)?;
    let existing = CrazyRecipes::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.is_approved = Set(true);
    active.updated_at = Set(Utc::now().into());
    let recipe = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::RecipeApprove,
        serde_json::json!({ "recipe_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Approved",
        CrazyRecipe::from(recipe),
        Some(Meta::empty()),
    ))
}

pub async fn bulk_update_approval(
    state: &AppState,
    user: &AuthUser,
    payload: BulkApprovalRequest,
) -> AppResult<ApiResponse<BulkApprovalResponse>> {
    ensure_admin(user)?;
    if payload.recipe_ids.is_empty() {
        return Ok(ApiResponse::success(
            "Approval updated",
            BulkApprovalResponse { updated: 0 },
            Some(Meta::empty()),
        ));
    }

    let result = CrazyRecipes::update_many()
        .col_expr(Column::IsApproved, Expr::value(payload.approved))
        .col_expr(Column::UpdatedAt, Expr::current_timestamp().into())
        .filter(Column::Id.is_in(payload.recipe_ids.clone()))
        .exec(&state.orm)
        .await?;

    audit::record(
        &state.pool,
        Some(user.user_id),
        AuditAction::RecipeBulkApproval,
        serde_json::json!({
            "recipe_ids": payload.recipe_ids,
            "approved": payload.approved,
            "updated": result.rows_affected,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Approval updated",
        BulkApprovalResponse {
            updated: result.rows_affected,
        },
        Some(Meta::empty()),
    ))
}

pub async fn recipe_stats(
    state: &AppState,
    author_id: Option<Uuid>,
) -> AppResult<ApiResponse<RecipeStats>> {
    let total = CrazyRecipes::find().count(&state.orm).await? as i64;
    let approved = CrazyRecipes::find()
        .filter(Column::IsApproved.eq(true))
        .count(&state.orm)
        .await? as i64;
    let user_recipes = match author_id {
        Some(author_id) => CrazyRecipes::find()
            .filter(Column::AuthorId.eq(author_id))
            .count(&state.orm)
            .await? as i64,
        None => 0,
    };

    Ok(ApiResponse::success(
        "Recipe stats",
        RecipeStats {
            total,
            approved,
            user_recipes,
        },
        None,
    ))
}

/// Counter column bumped by [`bump_counter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Views,
    Likes,
}

impl Counter {
    fn column(&self) -> &'static str {
        match self {
            Counter::Views => "views_count",
            Counter::Likes => "likes_count",
        }
    }
}

/// Atomically add `delta` to a counter, never going below zero.
/// Returns false when the recipe does not exist.
pub async fn bump_counter(
    state: &AppState,
    recipe_id: Uuid,
    counter: Counter,
    delta: i32,
) -> AppResult<bool> {
    let column = counter.column();
    let sql = format!(
        "UPDATE crazy_recipes SET {column} = GREATEST({column} + $2, 0) WHERE id = $1"
    );
    let result = sqlx::query(&sql)
        .bind(recipe_id)
        .bind(delta)
        .execute(&state.pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Counter updates are best effort: failures are logged and swallowed.
pub async fn record_counter(state: &AppState, recipe_id: Uuid, counter: Counter, delta: i32) {
    match bump_counter(state, recipe_id, counter, delta).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::debug!(%recipe_id, ?counter, "counter update matched no recipe");
        }
        Err(err) => {
            tracing::warn!(%recipe_id, ?counter, error = %err, "failed to update counter");
        }
    }
}

pub async fn increment_views(state: &AppState, recipe_id: Uuid) {
    record_counter(state, recipe_id, Counter::Views, 1).await;
}

pub async fn increment_likes(state: &AppState, recipe_id: Uuid) {
    record_counter(state, recipe_id, Counter::Likes, 1).await;
}

pub async fn decrement_likes(state: &AppState, recipe_id: Uuid) {
    record_counter(state, recipe_id, Counter::Likes, -1).await;
}

pub fn is_recipe_owner(recipe: &CrazyRecipe, user_id: Option<Uuid>) -> bool {
    recipe.is_owned_by(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe_by(author_id: Uuid) -> CrazyRecipe {
        CrazyRecipe {
            id: Uuid::new_v4(),
            title: "Chocolate Covered Bacon".into(),
            description: "Crispy and sweet".into(),
            ingredients: vec!["bacon".into(), "chocolate".into()],
            instructions: "Dip.".into(),
            cooking_time: 20,
            is_veg: false,
            image_url: None,
            author_id,
            author_name: "cook".into(),
            author_email: "cook@example.com".into(),
            views_count: 0,
            likes_count: 0,
            is_approved: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_check_needs_matching_user() {
        let author = Uuid::new_v4();
        let recipe = recipe_by(author);
        assert!(is_recipe_owner(&recipe, Some(author)));
        assert!(!is_recipe_owner(&recipe, Some(Uuid::new_v4())));
        assert!(!is_recipe_owner(&recipe, None));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("tofu"), "tofu");
    }
}
