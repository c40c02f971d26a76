use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use laundry_pos_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let user_id = ensure_user(&pool, "Cashier", "cashier@example.com", "cashier123").await?;
    let outlet_id = ensure_outlet(&pool, "Main Outlet", "MAIN1", "Jl. Melati 1").await?;
    seed_customers(&pool, outlet_id).await?;
    seed_services(&pool, outlet_id).await?;

    println!("Seed completed. User ID: {user_id}, Outlet ID: {outlet_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    // If the user already exists, fetch its id.
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

async fn ensure_outlet(
    pool: &sqlx::PgPool,
    name: &str,
    code: &str,
    address: &str,
) -> anyhow::Result<Uuid> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO outlets (id, name, code, address)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (code) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(code)
    .bind(address)
    .fetch_optional(pool)
    .await?;

    let outlet_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM outlets WHERE code = $1")
                .bind(code)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured outlet {code}");
    Ok(outlet_id)
}

async fn seed_customers(pool: &sqlx::PgPool, outlet_id: Uuid) -> anyhow::Result<()> {
    let customers = vec![
        ("Budi Santoso", "0812000111", "Jl. Kenanga 5"),
        ("Siti Rahayu", "0812000222", "Jl. Mawar 12"),
        ("Agus Wijaya", "0812000333", "Jl. Anggrek 3"),
    ];

    for (name, phone, address) in customers {
        sqlx::query(
            r#"
            INSERT INTO customers (id, outlet_id, name, phone_number, address)
            SELECT $1, $2, $3, $4, $5
            WHERE NOT EXISTS (
                SELECT 1 FROM customers WHERE outlet_id = $2 AND phone_number = $4
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(outlet_id)
        .bind(name)
        .bind(phone)
        .bind(address)
        .execute(pool)
        .await?;
    }

    println!("Seeded customers");
    Ok(())
}

async fn seed_services(pool: &sqlx::PgPool, outlet_id: Uuid) -> anyhow::Result<()> {
    // Categories come from the master data migration.
    let services = vec![
        ("Wash & Fold Regular", "Wash & Fold", 7000_i64, "kg"),
        ("Wash & Iron Regular", "Wash & Iron", 9000, "kg"),
        ("Ironing Service", "Ironing Only", 4000, "kg"),
        ("Blanket Dry Clean", "Dry Cleaning", 15000, "pcs"),
        ("Express 6 Hours", "Express", 12000, "kg"),
    ];

    for (name, category, price, unit) in services {
        sqlx::query(
            r#"
            INSERT INTO services (id, outlet_id, category_id, name, price, unit)
            SELECT $1, $2, c.id, $3, $4, $5
            FROM service_categories c
            WHERE c.name = $6
              AND NOT EXISTS (
                SELECT 1 FROM services WHERE outlet_id = $2 AND name = $3
              )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(outlet_id)
        .bind(name)
        .bind(price)
        .bind(unit)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded services");
    Ok(())
}
