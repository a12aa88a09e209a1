use crazy_recipes_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&orm_from_pool(pool.clone())).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123", "Admin", "admin").await?;
    let user_id = ensure_user(&pool, "user@example.com", "user123", "Crazy Cook", "user").await?;
    seed_recipes(&pool, user_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    username: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, username, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(username)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_recipes(pool: &sqlx::PgPool, author_id: Uuid) -> anyhow::Result<()> {
    let recipes: [(&str, &str, &[&str], i32, bool); 3] = [
        (
            "Pickle Ice Cream",
            "Sweet cream churned with dill pickle brine",
            &["heavy cream", "sugar", "dill pickles", "pickle brine"],
            45,
            true,
        ),
        (
            "Chocolate Covered Bacon",
            "Crispy bacon dipped in dark chocolate",
            &["bacon", "dark chocolate", "sea salt"],
            30,
            false,
        ),
        (
            "Peanut Butter Pizza",
            "Flatbread with peanut butter, banana and chili",
            &["pizza dough", "peanut butter", "banana", "chili flakes"],
            25,
            true,
        ),
    ];

    for (title, description, ingredients, cooking_time, is_veg) in recipes {
        let exists: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM crazy_recipes WHERE title = $1")
                .bind(title)
                .fetch_optional(pool)
                .await?;
        if exists.is_some() {
            continue;
        }

        let ingredients: Vec<String> = ingredients.iter().map(|i| i.to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO crazy_recipes (
                id, title, description, ingredients, instructions, cooking_time, is_veg,
                author_id, author_name, author_email, is_approved
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, u.id, COALESCE(u.username, u.email), u.email, true
            FROM users u WHERE u.id = $8
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .bind(ingredients)
        .bind("Combine everything and trust the process.")
        .bind(cooking_time)
        .bind(is_veg)
        .bind(author_id)
        .execute(pool)
        .await?;
    }

    println!("Seeded recipes");
    Ok(())
}
