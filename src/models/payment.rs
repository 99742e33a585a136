// src/models/payment.rs

use crate::models::order::PaymentStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use sqlx::{types::Json, FromRow};
use uuid::Uuid;

/// One payment attempt against an order. The gateway's `transaction_id` is
/// the join key used by webhooks (they carry no order id), so it is unique
/// across all payments. Rows are only ever inserted and updated, never
/// deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
  pub id: Uuid,
  pub order_id: Uuid,
  pub transaction_id: String,
  /// Whole XOF francs, same unit as `Order::total_amount`.
  pub amount: i64,
  pub currency: String,
  pub status: PaymentStatus,
  /// Raw provider payload from the last create/webhook/verify response.
  pub metadata: Json<JsonValue>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
