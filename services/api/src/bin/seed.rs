//! Development seed data for the Vehicle Tracker database
//!
//! Clears both tables and inserts a known set of users and vehicles.
//! Standalone on purpose: run with `cargo run --bin seed`.

use anyhow::Result;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use common::database::{DatabaseConfig, init_pool};
use sqlx::PgPool;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();
    Ok(hash)
}

async fn seed_users(pool: &PgPool) -> Result<u64> {
    let users = [
        ("Rendi Buana", "rendibuana@gmail.com", "Admin123#", "ADMIN"),
        ("Admin Widya", "admin@widya.com", "Admin456!", "ADMIN"),
        ("Budi Santoso", "budi.santoso@gmail.com", "User123!", "USER"),
        ("Siti Nurhaliza", "siti.nurhaliza@gmail.com", "User456!", "USER"),
        ("Ahmad Rizky", "ahmad.rizky@gmail.com", "User789!", "USER"),
    ];

    let mut created = 0;
    for (name, email, password, role) in users {
        let password_hash = hash_password(password)?;
        sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4::user_role)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(&password_hash)
        .bind(role)
        .execute(pool)
        .await?;
        created += 1;
    }

    Ok(created)
}

async fn seed_vehicles(pool: &PgPool) -> Result<u64> {
    let vehicles = [
        ("Toyota Avanza - B1234XYZ", "ACTIVE", 75.5, 45230.8, -6.200000, 106.816666, 0.0),
        ("Honda Jazz - B5678ABC", "ACTIVE", 60.2, 32150.5, -6.175110, 106.865036, 45.5),
        ("Suzuki Ertiga - B9012DEF", "ACTIVE", 85.0, 28900.0, -6.914744, 107.609810, 60.0),
        ("Daihatsu Xenia - B3456GHI", "INACTIVE", 20.5, 67890.3, -7.797068, 110.370529, 0.0),
        ("Mitsubishi Pajero - B7890JKL", "ACTIVE", 95.0, 15230.2, -8.670458, 115.212631, 70.3),
        ("Isuzu Panther - B2345MNO", "MAINTENANCE", 45.8, 125600.7, -6.121435, 106.774124, 0.0),
        ("Toyota Fortuner - B6789PQR", "ACTIVE", 70.0, 52100.5, -6.302100, 106.652800, 55.0),
        ("Honda CR-V - B0123STU", "ACTIVE", 80.5, 38750.0, -6.229728, 106.689857, 40.2),
        ("Nissan X-Trail - B4567VWX", "ACTIVE", 55.3, 44320.8, -3.316694, 114.590111, 65.8),
        ("Mazda CX-5 - B8901YZA", "INACTIVE", 30.0, 71450.2, -5.147665, 119.432732, 0.0),
        ("Hyundai Creta - B1357BCD", "ACTIVE", 92.0, 18900.5, -0.502106, 117.153709, 50.5),
        ("KIA Seltos - B2468EFG", "ACTIVE", 65.5, 35670.3, -6.990389, 110.423447, 58.7),
    ];

    let mut created = 0;
    for (name, status, fuel_level, odometer, latitude, longitude, speed) in vehicles {
        sqlx::query(
            r#"
            INSERT INTO vehicles (name, status, fuel_level, odometer, latitude, longitude, speed)
            VALUES ($1, $2::vehicle_status, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(name)
        .bind(status)
        .bind(fuel_level)
        .bind(odometer)
        .bind(latitude)
        .bind(longitude)
        .bind(speed)
        .execute(pool)
        .await?;
        created += 1;
    }

    Ok(created)
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting database seeding");

    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("Clearing existing data");
    sqlx::query("DELETE FROM vehicles").execute(&pool).await?;
    sqlx::query("DELETE FROM users").execute(&pool).await?;

    let users = seed_users(&pool).await?;
    info!("Created {} users (2 admins)", users);

    let vehicles = seed_vehicles(&pool).await?;
    info!("Created {} vehicles", vehicles);

    info!("Seeding completed; admin login: rendibuana@gmail.com / Admin123#");

    Ok(())
}
