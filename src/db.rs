// src/db.rs

//! Development seed data, applied at startup when `SEED_DB` is set.

use crate::errors::AppError;
use crate::models::Role;
use crate::services::auth;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

/// Seeds a demo seller, an admin, and a small catalog. A no-op once any
/// user exists, so it is safe to leave enabled between restarts.
#[instrument(name = "db::seed_db", skip(pool))]
pub async fn seed_db(pool: &PgPool) -> Result<(), AppError> {
  let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(pool).await?;
  if user_count > 0 {
    info!("Database already has users; skipping seed.");
    return Ok(());
  }

  let seller_id = Uuid::new_v4();
  let password_hash = auth::hash_password("changeme123")?;

  sqlx::query(
    "INSERT INTO users (id, email, password_hash, first_name, last_name, role) VALUES ($1, $2, $3, $4, $5, $6)",
  )
  .bind(seller_id)
  .bind("seller@tokpa.example")
  .bind(&password_hash)
  .bind("Demo")
  .bind("Seller")
  .bind(Role::Seller)
  .execute(pool)
  .await?;

  sqlx::query(
    "INSERT INTO users (id, email, password_hash, first_name, last_name, role) VALUES ($1, $2, $3, $4, $5, $6)",
  )
  .bind(Uuid::new_v4())
  .bind("admin@tokpa.example")
  .bind(&password_hash)
  .bind("Demo")
  .bind("Admin")
  .bind(Role::Admin)
  .execute(pool)
  .await?;

  // Prices are whole XOF francs.
  let catalog: [(&str, &str, i64, i32); 4] = [
    ("Gari fin (1 kg)", "Farine de manioc torréfiée.", 800, 120),
    ("Huile rouge (1 L)", "Huile de palme artisanale.", 1500, 40),
    ("Ananas pain de sucre (pièce)", "Ananas de l'Atlantique.", 500, 200),
    ("Tissu wax (6 yards)", "Pagne imprimé, motif classique.", 12000, 15),
  ];
  for (name, description, price, stock) in catalog {
    sqlx::query(
      "INSERT INTO products (id, seller_id, name, description, price, stock) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(Uuid::new_v4())
    .bind(seller_id)
    .bind(name)
    .bind(description)
    .bind(price)
    .bind(stock)
    .execute(pool)
    .await?;
  }

  info!("Seeded demo accounts and catalog.");
  Ok(())
}
