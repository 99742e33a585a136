// src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::models::Role;
use crate::services::auth;
use crate::state::AppState;
use crate::web::extractors::CurrentUser;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequestPayload {
  pub email: String,
  pub password: String,
  pub first_name: String,
  pub last_name: String,
  pub role: Option<Role>,
}

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

// --- Handler Implementations ---

#[instrument(
  name = "handler::signup",
  skip(app_state, req_payload),
  fields(req_email = %req_payload.email)
)]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let (user, token) = auth::signup(
    &app_state.db_pool,
    &req_payload.email,
    &req_payload.password,
    &req_payload.first_name,
    &req_payload.last_name,
    req_payload.role,
  )
  .await?;

  info!(user_id = %user.id, "Signup successful.");
  Ok(HttpResponse::Created().json(json!({
    "message": "Account created successfully.",
    "user": user,
    "token": token,
  })))
}

#[instrument(
  name = "handler::signin",
  skip(app_state, req_payload),
  fields(req_email = %req_payload.email)
)]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let (user, token) = auth::signin(&app_state.db_pool, &req_payload.email, &req_payload.password).await?;

  info!(user_id = %user.id, "Signin successful.");
  Ok(HttpResponse::Ok().json(json!({
    "message": "Signin successful.",
    "user": user,
    "token": token,
  })))
}

#[instrument(name = "handler::me", skip(current_user), fields(user_id = %current_user.0.id))]
pub async fn me_handler(current_user: CurrentUser) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(json!({ "user": current_user.0 })))
}
