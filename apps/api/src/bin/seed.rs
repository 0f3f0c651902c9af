//! Development seed binary.
//!
//! Idempotent: existing rows are left alone, so running it against a
//! populated database is safe.
//!
//! ```text
//! DATABASE_URL=postgres://... cargo run --bin seed
//! ```

use chrono::{TimeZone, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use botica_api::auth::hash_password;
use botica_db::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let database_url = std::env::var("DATABASE_URL")?;
    let db = Database::connect(&database_url, 5).await?;
    db.run_migrations().await?;

    info!("Starting seed...");

    seed_users(&db).await?;
    seed_lookups(&db).await?;
    seed_medications(&db).await?;

    info!("Seed completed successfully!");
    info!("Admin user: admin@pharmacy.com / admin123");
    info!("Regular user: user@pharmacy.com / user123");
    Ok(())
}

async fn seed_users(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    let accounts = [
        ("admin@pharmacy.com", "admin123", "Admin", "System", "admin"),
        ("user@pharmacy.com", "user123", "Juan", "Pérez", "user"),
    ];

    for (email, password, given_name, family_name, role) in accounts {
        let hash = hash_password(password)?;
        sqlx::query(
            r#"
            INSERT INTO users (email, password_hash, given_name, family_name, role)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(email)
        .bind(hash)
        .bind(given_name)
        .bind(family_name)
        .bind(role)
        .execute(db.pool())
        .await?;
    }

    Ok(())
}

async fn seed_lookups(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    for description in ["Analgésico", "Antibiótico"] {
        sqlx::query(
            r#"
            INSERT INTO medication_types (description)
            SELECT $1
            WHERE NOT EXISTS (SELECT 1 FROM medication_types WHERE description = $1)
            "#,
        )
        .bind(description)
        .execute(db.pool())
        .await?;
    }

    for description in ["Cardiología", "Neurología"] {
        sqlx::query(
            r#"
            INSERT INTO specialties (description)
            SELECT $1
            WHERE NOT EXISTS (SELECT 1 FROM specialties WHERE description = $1)
            "#,
        )
        .bind(description)
        .execute(db.pool())
        .await?;
    }

    Ok(())
}

async fn seed_medications(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    // (description, manufactured, expires, presentation, stock,
    //  unit cents, pack cents, type, brand, specialty)
    let medications = [
        (
            "Paracetamol 500mg",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            "Tabletas",
            100,
            50_i64,
            1200_i64,
            "Analgésico",
            "Genérico",
            "Neurología",
        ),
        (
            "Amoxicilina 500mg",
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
            "Cápsulas",
            50,
            120_i64,
            2400_i64,
            "Antibiótico",
            "Laboratorio ABC",
            "Cardiología",
        ),
    ];

    for (
        description,
        manufactured_at,
        expires_at,
        presentation,
        stock,
        unit_cents,
        pack_cents,
        type_description,
        brand,
        specialty_description,
    ) in medications
    {
        sqlx::query(
            r#"
            INSERT INTO medications (
                description, manufactured_at, expires_at, presentation,
                stock, unit_price_cents, pack_price_cents, type_id, brand, specialty_id
            )
            SELECT $1, $2, $3, $4, $5, $6, $7,
                   (SELECT id FROM medication_types WHERE description = $8),
                   $9,
                   (SELECT id FROM specialties WHERE description = $10)
            WHERE NOT EXISTS (SELECT 1 FROM medications WHERE description = $1)
            "#,
        )
        .bind(description)
        .bind(manufactured_at)
        .bind(expires_at)
        .bind(presentation)
        .bind(stock)
        .bind(unit_cents)
        .bind(pack_cents)
        .bind(type_description)
        .bind(brand)
        .bind(specialty_description)
        .execute(db.pool())
        .await?;
    }

    Ok(())
}
