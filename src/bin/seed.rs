use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_restaurant_api::{config::AppConfig, db::create_pool};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let user_id = ensure_user(&pool, "diner@example.com", "diner123", "Dana", "Diner").await?;
    seed_menu(&pool).await?;

    println!("Seed completed. Demo user ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, first_name, last_name)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .fetch_optional(pool)
    .await?;

    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email}");
    Ok(user_id)
}

async fn seed_menu(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let categories = [
        ("Starters", "starters"),
        ("Mains", "mains"),
        ("Desserts", "desserts"),
        ("Drinks", "drinks"),
    ];

    for (name, slug) in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug)
            VALUES ($1, $2, $3)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(slug)
        .execute(pool)
        .await?;
    }

    let items: [(&str, &str, Decimal, &str, bool); 6] = [
        (
            "Bruschetta",
            "Grilled bread, tomatoes, basil, olive oil",
            dec!(7.50),
            "starters",
            false,
        ),
        (
            "Wild Mushroom Soup",
            "Cream of forest mushrooms with truffle oil",
            dec!(8.00),
            "starters",
            true,
        ),
        (
            "Margherita Pizza",
            "San Marzano tomatoes, mozzarella, fresh basil",
            dec!(13.50),
            "mains",
            true,
        ),
        (
            "Grilled Salmon",
            "Atlantic salmon, lemon butter, seasonal greens",
            dec!(19.90),
            "mains",
            true,
        ),
        (
            "Tiramisu",
            "Espresso-soaked ladyfingers, mascarpone",
            dec!(6.50),
            "desserts",
            false,
        ),
        (
            "House Lemonade",
            "Fresh-squeezed, lightly sparkling",
            dec!(3.90),
            "drinks",
            false,
        ),
    ];

    for (name, description, price, category_slug, featured) in items {
        sqlx::query(
            r#"
            INSERT INTO items (id, name, description, price, category_id, featured)
            SELECT $1, $2, $3, $4, c.id, $6
            FROM categories c
            WHERE c.slug = $5
              AND NOT EXISTS (SELECT 1 FROM items WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(category_slug)
        .bind(featured)
        .execute(pool)
        .await?;
    }

    println!("Seeded menu");
    Ok(())
}
