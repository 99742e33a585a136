// src/web/extractors.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::errors::AppError;
use crate::models::{Role, User};
use crate::services::auth;
use crate::state::AppState;

/// The authenticated caller, resolved from the `Authorization: Bearer`
/// session token. Extracting this in a handler signature is what makes a
/// route require authentication.
#[derive(Debug)]
pub struct CurrentUser(pub User);

impl CurrentUser {
  /// Product catalog writes are reserved for sellers and admins.
  pub fn require_catalog_access(&self) -> Result<(), AppError> {
    match self.0.role {
      Role::Seller | Role::Admin => Ok(()),
      _ => Err(AppError::Auth(
        "Only seller or admin accounts can manage products.".to_string(),
      )),
    }
  }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
fn bearer_token(header: Option<&str>) -> Option<&str> {
  header
    .and_then(|value| value.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|token| !token.is_empty())
}

impl FromRequest for CurrentUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let req = req.clone();
    Box::pin(async move {
      let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

      let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
      let token = bearer_token(header).ok_or_else(|| {
        warn!("Request to an authenticated route without a bearer token.");
        AppError::Auth("Authentication required: missing bearer token.".to_string())
      })?;

      let user = auth::user_for_token(&state.db_pool, token).await?;
      Ok(CurrentUser(user))
    })
  }
}
