use axum_bookshop_api::{config::AppConfig, db::create_pool, services::auth_service::hash_password};
use uuid::Uuid;

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    category: &'static str,
    price: i64,
    market_price: Option<i64>,
    price_to_sell: Option<i64>,
    price_per_piece: Option<i64>,
    price_per_packet: Option<i64>,
    images: &'static [&'static str],
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@bookshop.example", "admin123", "admin").await?;
    let user_id = ensure_user(&pool, "user@bookshop.example", "user123", "user").await?;
    seed_products(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
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

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = [
        SeedProduct {
            name: "The Rust Programming Language",
            description: "Ownership, borrowing and fearless concurrency, cover to cover",
            category: "book",
            price: 700,
            market_price: Some(600),
            price_to_sell: Some(450),
            price_per_piece: None,
            price_per_packet: None,
            images: &["trpl-front.jpg", "trpl-back.jpg"],
        },
        SeedProduct {
            name: "Ballpoint Pen (Blue)",
            description: "Smooth 0.7mm tip, sold singly or as a box of ten",
            category: "stationery",
            price: 20,
            market_price: None,
            price_to_sell: None,
            price_per_piece: Some(15),
            price_per_packet: Some(120),
            images: &["pen-blue.jpg"],
        },
        SeedProduct {
            name: "Gift Wrap Roll",
            description: "Two metres of kraft wrapping paper",
            category: "gift",
            price: 90,
            market_price: None,
            price_to_sell: None,
            price_per_piece: Some(90),
            price_per_packet: None,
            images: &["wrap-roll.jpg"],
        },
        SeedProduct {
            name: "Table Tennis Ball Set",
            description: "Six regulation 40mm balls",
            category: "sport",
            price: 250,
            market_price: None,
            price_to_sell: None,
            price_per_piece: None,
            price_per_packet: None,
            images: &[],
        },
    ];

    for p in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, category, price,
                market_price, price_to_sell, price_per_piece, price_per_packet, images)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(p.name)
        .bind(p.description)
        .bind(p.category)
        .bind(p.price)
        .bind(p.market_price)
        .bind(p.price_to_sell)
        .bind(p.price_per_piece)
        .bind(p.price_per_packet)
        .bind(serde_json::json!(p.images))
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
