// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

/// Fulfillment status of an order. Only `Pending`, `Confirmed` and
/// `Cancelled` are written by the payment flow; `Shipped`/`Delivered` belong
/// to order management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
  Pending,
  Confirmed,
  Shipped,
  Delivered,
  Cancelled,
}

/// Payment status of an order (and of each payment attempt). `Refunded` is
/// only reachable through back-office operations, never from the gateway
/// reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SqlxType)]
#[sqlx(type_name = "payment_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
  Pending,
  Approved,
  Failed,
  Cancelled,
  Refunded,
}

/// A buyer's purchase: line items + delivery address. `status` and
/// `payment_status` are always updated together (see `services::reconcile`).
/// `transaction_id` tracks the latest gateway transaction for the order.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  pub id: Uuid,
  pub buyer_id: Uuid,
  pub address: String,
  pub status: OrderStatus,
  pub payment_status: PaymentStatus,
  /// Whole XOF francs. The gateway wire format multiplies by 100.
  pub total_amount: i64,
  pub transaction_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
