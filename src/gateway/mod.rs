// src/gateway/mod.rs

//! Payment gateway integration: the outbound counterpart of the webhook.
//!
//! `PaymentGateway` is the seam the services call through; `HttpPaymentGateway`
//! is the production implementation speaking the provider's REST API. Keeping
//! the seam a trait lets alternative backends (or a stub in tests) slot in
//! without touching the payment services.

pub mod http;

pub use http::HttpPaymentGateway;

use crate::errors::AppError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value as JsonValue;

/// Buyer details forwarded to the provider when creating a transaction.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerInfo {
  pub email: String,
  pub firstname: String,
  pub lastname: String,
}

/// Body of `POST {base}/transactions`. Amounts are in minor units
/// (order total ×100); currency is always "XOF".
#[derive(Debug, Clone, Serialize)]
pub struct CreateTransactionRequest {
  pub description: String,
  pub amount: i64,
  pub currency: String,
  pub callback_url: String,
  pub return_url: String,
  pub customer: CustomerInfo,
}

/// A provider transaction as this application sees it: the id and coarse
/// status it acts on, plus the untouched response for the metadata blob.
#[derive(Debug, Clone)]
pub struct GatewayTransaction {
  pub id: String,
  pub status: Option<String>,
  pub raw: JsonValue,
}

impl GatewayTransaction {
  /// Extracts id/status from a provider response. Responses are accepted
  /// either flat (`{"id": ..., "status": ...}`) or wrapped in a
  /// `"transaction"` envelope; ids may arrive as strings or numbers.
  pub fn from_response(raw: JsonValue) -> Result<Self, AppError> {
    let body = raw.get("transaction").unwrap_or(&raw);
    let id = match body.get("id") {
      Some(JsonValue::String(s)) if !s.is_empty() => s.clone(),
      Some(JsonValue::Number(n)) => n.to_string(),
      _ => {
        return Err(AppError::Provider(
          "Provider response carried no transaction id".to_string(),
        ))
      }
    };
    let status = body
      .get("status")
      .and_then(JsonValue::as_str)
      .map(|s| s.to_string());
    Ok(Self { id, status, raw })
  }
}

/// Outbound provider operations used by the payment services.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
  /// `POST /transactions`: registers a pending transaction for an order.
  async fn create_transaction(&self, request: &CreateTransactionRequest) -> Result<GatewayTransaction, AppError>;

  /// `GET /transactions/{id}`: re-reads the current transaction state
  /// (the status-poll fallback when the webhook has not arrived).
  async fn verify_transaction(&self, transaction_id: &str) -> Result<GatewayTransaction, AppError>;

  /// `POST /transactions/{id}/cancel`: asks the provider to abandon a
  /// pending transaction.
  async fn cancel_transaction(&self, transaction_id: &str) -> Result<GatewayTransaction, AppError>;

  /// Provider-hosted checkout page for a transaction.
  fn payment_url(&self, transaction_id: &str) -> String;
}
