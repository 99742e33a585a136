// src/web/handlers/webhook_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, instrument, warn};

use crate::errors::AppError;
use crate::services::reconcile::{self, ProviderStatus, WebhookPayload};
use crate::state::AppState;

/// Header the provider signs its callbacks with.
const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Signature policy: enforced when a webhook secret is configured, open
/// otherwise. Sandbox providers do not sign their callbacks.
fn signature_is_valid(expected: Option<&str>, provided: Option<&str>) -> bool {
  match expected {
    None => true,
    Some(expected) => provided == Some(expected),
  }
}

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatusPollQuery {
  pub transaction_id: Option<String>,
}

// --- Handler Implementations ---

#[instrument(name = "handler::payment_webhook", skip(app_state, req, body))]
pub async fn payment_webhook_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  body: web::Json<JsonValue>,
) -> Result<HttpResponse, AppError> {
  let provided_signature = req
    .headers()
    .get(SIGNATURE_HEADER)
    .and_then(|value| value.to_str().ok());
  if !signature_is_valid(app_state.config.gateway_webhook_secret.as_deref(), provided_signature) {
    warn!("Webhook rejected: signature mismatch.");
    return Err(AppError::Auth("Invalid webhook signature.".to_string()));
  }
  if app_state.config.gateway_webhook_secret.is_none() {
    debug!("Webhook signature verification is not configured; accepting unsigned callback.");
  }

  let payload = WebhookPayload::parse(&body);
  let transaction_id = payload.transaction_id.ok_or_else(|| {
    warn!("Webhook payload carried no transaction reference.");
    AppError::Validation("Webhook payload must include a transaction id.".to_string())
  })?;
  let incoming = ProviderStatus::parse(payload.status.as_deref());

  let reconciled = reconcile::apply_transaction_status(&app_state.db_pool, &transaction_id, incoming, &body).await?;

  info!(
    transaction_id = %transaction_id,
    order_id = %reconciled.order.id,
    payment_status = ?reconciled.payment.status,
    "Webhook reconciled."
  );
  Ok(HttpResponse::Ok().json(json!({ "success": true })))
}

#[instrument(name = "handler::poll_payment_status", skip(app_state, query))]
pub async fn poll_payment_status_handler(
  app_state: web::Data<AppState>,
  query: web::Query<StatusPollQuery>,
) -> Result<HttpResponse, AppError> {
  let transaction_id = query
    .transaction_id
    .as_deref()
    .map(str::trim)
    .filter(|id| !id.is_empty())
    .ok_or_else(|| AppError::Validation("Query parameter 'transactionId' is required.".to_string()))?;

  let polled =
    reconcile::poll_transaction_status(&app_state.db_pool, app_state.gateway.as_ref(), transaction_id).await?;

  info!(
    transaction_id = %transaction_id,
    payment_status = ?polled.payment.status,
    "Status poll reconciled."
  );
  Ok(HttpResponse::Ok().json(json!({
    "transaction": polled.transaction,
    "payment": polled.payment,
  })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unsigned_callbacks_pass_when_no_secret_is_configured() {
    assert!(signature_is_valid(None, None));
    assert!(signature_is_valid(None, Some("anything")));
  }

  #[test]
  fn a_configured_secret_must_match_exactly() {
    assert!(signature_is_valid(Some("whsec_1"), Some("whsec_1")));
    assert!(!signature_is_valid(Some("whsec_1"), Some("whsec_2")));
    assert!(!signature_is_valid(Some("whsec_1"), None));
  }
}
