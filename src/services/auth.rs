// src/services/auth.rs

//! Accounts and sessions: Argon2 password hashing, signup/signin, and the
//! bearer-token sessions the request extractor resolves.

use crate::errors::AppError;
use crate::models::{Role, User};
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Sessions outlive the browser tab but not the month.
const SESSION_LIFETIME_DAYS: i64 = 30;

/// Hashes a plain-text password with Argon2 and a fresh random salt.
#[instrument(name = "auth::hash_password", skip(password))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verifies a plain-text password against a stored Argon2 hash. A mismatch
/// is `Ok(false)`; only a malformed stored hash is an error.
#[instrument(name = "auth::verify_password", skip_all)]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool, AppError> {
  let parsed = PasswordHash::new(stored_hash)
    .map_err(|e| AppError::Internal(format!("Stored password hash is malformed: {}", e)))?;
  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(e) => Err(AppError::Internal(format!("Password verification failed: {}", e))),
  }
}

/// Signup input checks shared with the handler tests.
pub fn validate_signup(email: &str, password: &str) -> Result<(), AppError> {
  let email = email.trim();
  if email.is_empty() {
    return Err(AppError::Validation("Email is required.".to_string()));
  }
  if !email.contains('@') {
    return Err(AppError::Validation("Email address is not valid.".to_string()));
  }
  if password.len() < 8 {
    return Err(AppError::Validation(
      "Password must be at least 8 characters long.".to_string(),
    ));
  }
  Ok(())
}

/// Registers a new account and opens a session for it. Public signup only
/// mints buyer and seller accounts; staff roles are provisioned elsewhere.
#[instrument(name = "auth::signup", skip(pool, password, first_name, last_name), fields(email = %email))]
pub async fn signup(
  pool: &PgPool,
  email: &str,
  password: &str,
  first_name: &str,
  last_name: &str,
  role: Option<Role>,
) -> Result<(User, String), AppError> {
  validate_signup(email, password)?;
  let role = match role.unwrap_or(Role::Buyer) {
    Role::Buyer => Role::Buyer,
    Role::Seller => Role::Seller,
    _ => {
      return Err(AppError::Validation(
        "Only buyer and seller accounts can be created here.".to_string(),
      ))
    }
  };
  let email = email.trim().to_ascii_lowercase();

  let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
    .bind(&email)
    .fetch_optional(pool)
    .await?;
  if existing.is_some() {
    return Err(AppError::Validation(format!("Email '{}' is already registered.", email)));
  }

  let password_hash = hash_password(password)?;
  let user = sqlx::query_as::<_, User>(
    "INSERT INTO users (id, email, password_hash, first_name, last_name, role) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(&email)
  .bind(&password_hash)
  .bind(first_name.trim())
  .bind(last_name.trim())
  .bind(role)
  .fetch_one(pool)
  .await?;

  let token = create_session(pool, user.id).await?;
  info!(user_id = %user.id, ?role, "Account created.");
  Ok((user, token))
}

/// Checks credentials and opens a session. Unknown emails and wrong
/// passwords fail identically so the response does not leak which
/// addresses have accounts.
#[instrument(name = "auth::signin", skip(pool, password), fields(email = %email))]
pub async fn signin(pool: &PgPool, email: &str, password: &str) -> Result<(User, String), AppError> {
  let email = email.trim().to_ascii_lowercase();
  let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
    .bind(&email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::Auth("Invalid email or password.".to_string()))?;

  if !verify_password(&user.password_hash, password)? {
    debug!("Password mismatch.");
    return Err(AppError::Auth("Invalid email or password.".to_string()));
  }

  let token = create_session(pool, user.id).await?;
  info!(user_id = %user.id, "Signed in.");
  Ok((user, token))
}

/// Opens a session and returns its bearer token.
async fn create_session(pool: &PgPool, user_id: Uuid) -> Result<String, AppError> {
  let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
  let expires_at = Utc::now() + Duration::days(SESSION_LIFETIME_DAYS);
  sqlx::query("INSERT INTO sessions (id, user_id, token, expires_at) VALUES ($1, $2, $3, $4)")
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&token)
    .bind(expires_at)
    .execute(pool)
    .await?;
  Ok(token)
}

/// Resolves a bearer token to its user, rejecting expired sessions.
pub async fn user_for_token(pool: &PgPool, token: &str) -> Result<User, AppError> {
  sqlx::query_as::<_, User>(
    "SELECT u.* FROM users u \
     JOIN sessions s ON s.user_id = u.id \
     WHERE s.token = $1 AND s.expires_at > NOW()",
  )
  .bind(token)
  .fetch_optional(pool)
  .await?
  .ok_or_else(|| AppError::Auth("Invalid or expired session token.".to_string()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hashing_then_verifying_roundtrips() {
    let hash = hash_password("correct horse battery").unwrap();
    assert!(verify_password(&hash, "correct horse battery").unwrap());
    assert!(!verify_password(&hash, "wrong horse").unwrap());
  }

  #[test]
  fn empty_passwords_cannot_be_hashed() {
    assert!(matches!(hash_password(""), Err(AppError::Validation(_))));
  }

  #[test]
  fn malformed_stored_hashes_are_internal_errors() {
    let err = verify_password("not-an-argon2-hash", "whatever").unwrap_err();
    assert!(matches!(err, AppError::Internal(_)));
  }

  #[test]
  fn signup_validation_rejects_bad_input() {
    assert!(matches!(validate_signup("", "longenough"), Err(AppError::Validation(_))));
    assert!(matches!(
      validate_signup("no-at-sign", "longenough"),
      Err(AppError::Validation(_))
    ));
    assert!(matches!(
      validate_signup("ayo@example.com", "short"),
      Err(AppError::Validation(_))
    ));
    assert!(validate_signup("ayo@example.com", "longenough").is_ok());
  }
}
