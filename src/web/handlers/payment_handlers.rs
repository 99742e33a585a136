// src/web/handlers/payment_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::payments;
use crate::state::AppState;
use crate::web::extractors::CurrentUser;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InitiatePaymentRequestPayload {
  pub order_id: Uuid,
  pub return_url: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsQuery {
  pub order_id: Option<Uuid>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CancelPaymentRequestPayload {
  pub transaction_id: String,
}

// --- Handler Implementations ---

#[instrument(
  name = "handler::initiate_payment",
  skip(app_state, req_payload, current_user),
  fields(buyer_id = %current_user.0.id, order_id = %req_payload.order_id)
)]
pub async fn initiate_payment_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<InitiatePaymentRequestPayload>,
  current_user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  let initiated = payments::initiate_payment(
    &app_state.db_pool,
    app_state.gateway.as_ref(),
    &app_state.config,
    &current_user.0,
    req_payload.order_id,
    req_payload.return_url.as_deref(),
  )
  .await?;

  info!(transaction_id = %initiated.transaction_id, "Payment initiated.");
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "transactionId": initiated.transaction_id,
    "paymentUrl": initiated.payment_url,
    "transaction": initiated.transaction,
  })))
}

#[instrument(
  name = "handler::list_payments",
  skip(app_state, query, current_user),
  fields(buyer_id = %current_user.0.id)
)]
pub async fn list_payments_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListPaymentsQuery>,
  current_user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  let payments = payments::list_payments(&app_state.db_pool, current_user.0.id, query.order_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "payments": payments })))
}

#[instrument(
  name = "handler::cancel_payment",
  skip(app_state, req_payload, current_user),
  fields(buyer_id = %current_user.0.id, transaction_id = %req_payload.transaction_id)
)]
pub async fn cancel_payment_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CancelPaymentRequestPayload>,
  current_user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  let reconciled = payments::cancel_payment(
    &app_state.db_pool,
    app_state.gateway.as_ref(),
    current_user.0.id,
    &req_payload.transaction_id,
  )
  .await?;

  info!(order_id = %reconciled.order.id, "Payment cancelled.");
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "payment": reconciled.payment,
    "order": reconciled.order,
  })))
}
