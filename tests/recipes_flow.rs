use std::time::Duration;

use crazy_recipes_api::{
    db::{create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        recipes::{BulkApprovalRequest, CreateRecipeRequest, UpdateRecipeRequest},
        reviews::SubmitReviewRequest,
    },
    entity::favorites::{Column as FavoriteColumn, Entity as Favorites},
    entity::users::{ActiveModel as UserActive, Entity as Users},
    error::AppError,
    favorites::Notice,
    middleware::auth::{AuthUser, decode_token},
    routes::params::{RecipeFilterType, RecipeQuery, RecipeSortBy},
    services::{auth_service, favorite_service, recipe_service, review_service},
    state::AppState,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
    Statement,
};
use uuid::Uuid;

// Integration flow: author submits a recipe -> admin approves -> others find, review
// and favorite it; favorites drive likes_count.
#[tokio::test]
async fn submit_approve_review_and_favorite_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        unsafe { std::env::set_var("JWT_SECRET", "flow-test-secret") };
        "flow-test-secret".to_string()
    });

    let author = register(&state, "cook@example.com", Some("Crazy Cook")).await?;
    let fan = register(&state, "fan@example.com", None).await?;
    let admin = register(&state, "admin@example.com", None).await?;
    promote_to_admin(&state, admin.user_id).await?;
    let admin = AuthUser {
        user_id: admin.user_id,
        role: "admin".into(),
    };

    // Login issues a bearer token for the same principal
    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: " Cook@Example.com ".into(),
            password: "secret123".into(),
        },
    )
    .await?
    .data
    .unwrap();
    let token = login.token.strip_prefix("Bearer ").unwrap();
    let principal = decode_token(token, &secret)?;
    assert_eq!(principal.user_id, author.user_id);
    assert_eq!(principal.role, "user");

    let wrong_password = auth_service::login_user(
        &state,
        LoginRequest {
            email: "cook@example.com".into(),
            password: "not-it".into(),
        },
    )
    .await;
    assert!(matches!(wrong_password, Err(AppError::BadRequest(_))));

    // Submit
    let recipe = recipe_service::create_recipe(
        &state,
        &author,
        CreateRecipeRequest {
            title: " Pickle Ice Cream ".into(),
            description: "Sweet and sour frozen treat".into(),
            ingredients: vec!["cream".into(), "pickles".into(), " ".into()],
            instructions: "Churn with brine.".into(),
            cooking_time: 45,
            is_veg: true,
            image_url: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(recipe.title, "Pickle Ice Cream");
    assert_eq!(recipe.author_name, "Crazy Cook");
    assert_eq!(recipe.ingredients.len(), 2);
    assert!(!recipe.is_approved);

    // Unapproved recipes stay out of the public listing
    let listed = recipe_service::list_recipes(&state, RecipeQuery::default()).await?;
    assert_eq!(listed.meta.unwrap().total, Some(0));

    // Only the author or an admin may edit
    let denied = recipe_service::update_recipe(
        &state,
        &fan,
        recipe.id,
        UpdateRecipeRequest {
            title: Some("Hijacked".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    // Approval is admin only
    assert!(matches!(
        recipe_service::approve_recipe(&state, &author, recipe.id).await,
        Err(AppError::Forbidden)
    ));
    let approved = recipe_service::approve_recipe(&state, &admin, recipe.id)
        .await?
        .data
        .unwrap();
    assert!(approved.is_approved);

    // Search, filter and sort
    let found = recipe_service::list_recipes(
        &state,
        RecipeQuery {
            q: Some("PICKLE".into()),
            filter_type: Some(RecipeFilterType::Veg),
            sort_by: Some(RecipeSortBy::Popular),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(found.data.unwrap().items.len(), 1);

    let non_veg = recipe_service::list_recipes(
        &state,
        RecipeQuery {
            filter_type: Some(RecipeFilterType::NonVeg),
            ..Default::default()
        },
    )
    .await?;
    assert!(non_veg.data.unwrap().items.is_empty());

    // Reviews
    let bad_review = review_service::submit_review(
        &state,
        &fan,
        recipe.id,
        SubmitReviewRequest {
            rating: 9,
            comment: "too much".into(),
            reviewer_name: None,
        },
    )
    .await;
    assert!(matches!(bad_review, Err(AppError::BadRequest(_))));

    let review = review_service::submit_review(
        &state,
        &fan,
        recipe.id,
        SubmitReviewRequest {
            rating: 4,
            comment: " Weirdly good ".into(),
            reviewer_name: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(review.reviewer_name, "fan");
    assert_eq!(review.comment, "Weirdly good");

    let reviews = review_service::list_reviews(&state, recipe.id).await?;
    assert_eq!(reviews.data.unwrap().items.len(), 1);
    let by_name = review_service::reviews_by_reviewers(&state, vec!["fan".into()]).await?;
    assert_eq!(by_name.data.unwrap().items.len(), 1);

    // Favorites: add, duplicate from a stale view, remove
    let recipe_key = recipe.id.to_string();
    let added = favorite_service::toggle_favorite(&state, Some(&fan), &recipe_key)
        .await?
        .data
        .unwrap();
    assert!(added.accepted && added.is_favorite);
    assert_eq!(added.notice, Notice::Added);

    let liked = recipe_service::get_recipe(&state, recipe.id).await?.data.unwrap();
    assert_eq!(liked.likes_count, 1);

    let listed = favorite_service::list_favorites(&state, &fan).await?;
    assert_eq!(listed.data.unwrap().items, vec![recipe_key.clone()]);

    // Static catalogue ids are favoritable too
    let static_fav = favorite_service::toggle_favorite(&state, Some(&fan), "recipe-42")
        .await?
        .data
        .unwrap();
    assert!(static_fav.is_favorite);

    let removed = favorite_service::toggle_favorite(&state, Some(&fan), &recipe_key)
        .await?
        .data
        .unwrap();
    assert!(removed.accepted && !removed.is_favorite);
    assert_eq!(removed.notice, Notice::Removed);
    let unliked = recipe_service::get_recipe(&state, recipe.id).await?.data.unwrap();
    assert_eq!(unliked.likes_count, 0);

    // Counters and stats
    recipe_service::increment_views(&state, recipe.id).await;
    recipe_service::decrement_likes(&state, recipe.id).await;
    let viewed = recipe_service::get_recipe(&state, recipe.id).await?.data.unwrap();
    assert_eq!(viewed.views_count, 1);
    assert_eq!(viewed.likes_count, 0);

    let stats = recipe_service::recipe_stats(&state, Some(author.user_id))
        .await?
        .data
        .unwrap();
    assert_eq!((stats.total, stats.approved, stats.user_recipes), (1, 1, 1));

    let bulk = recipe_service::bulk_update_approval(
        &state,
        &admin,
        BulkApprovalRequest {
            recipe_ids: vec![recipe.id],
            approved: false,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(bulk.updated, 1);

    let own = recipe_service::list_by_author(&state, author.user_id, true).await?;
    assert_eq!(own.data.unwrap().items.len(), 1);
    let public = recipe_service::list_by_author(&state, author.user_id, false).await?;
    assert!(public.data.unwrap().items.is_empty());

    // Delete
    recipe_service::delete_recipe(&state, &author, recipe.id).await?;
    assert!(matches!(
        recipe_service::get_recipe(&state, recipe.id).await,
        Err(AppError::NotFound)
    ));

    // Account deletion takes the user's favorites with it
    let fan_favorites = || {
        Favorites::find()
            .filter(FavoriteColumn::UserId.eq(fan.user_id))
            .count(&state.orm)
    };
    assert_eq!(fan_favorites().await?, 1);

    let deleted = auth_service::delete_account(&state, &fan, Some("moving on".into()))
        .await?
        .data
        .unwrap();
    assert_eq!(deleted.user_id, fan.user_id);
    assert_eq!(fan_favorites().await?, 0);
    assert!(Users::find_by_id(fan.user_id).one(&state.orm).await?.is_none());
    assert!(matches!(
        auth_service::delete_account(&state, &fan, None).await,
        Err(AppError::NotFound)
    ));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let state = AppState::new(pool, Duration::from_secs(5));
    run_migrations(&state.orm).await?;

    // Clean tables between runs
    let backend = state.orm.get_database_backend();
    state
        .orm
        .execute(Statement::from_string(
            backend,
            "TRUNCATE TABLE favorites, crazy_recipe_reviews, crazy_recipes, audit_logs, users RESTART IDENTITY CASCADE",
        ))
        .await?;

    Ok(state)
}

async fn register(
    state: &AppState,
    email: &str,
    username: Option<&str>,
) -> anyhow::Result<AuthUser> {
    let user = auth_service::register_user(
        state,
        RegisterRequest {
            email: email.into(),
            password: "secret123".into(),
            username: username.map(str::to_string),
        },
    )
    .await?
    .data
    .unwrap();

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

async fn promote_to_admin(state: &AppState, user_id: Uuid) -> anyhow::Result<()> {
    let user = Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user missing"))?;
    let mut active: UserActive = user.into();
    active.role = Set("admin".into());
    active.update(&state.orm).await?;
    Ok(())
}
