// src/services/reconcile.rs

//! Transaction-status reconciliation shared by the webhook handler and the
//! on-demand status poll. Both paths funnel through the same mapping and the
//! same database write so the two can never produce divergent state for one
//! transaction.

use crate::errors::AppError;
use crate::gateway::PaymentGateway;
use crate::models::{Order, OrderStatus, Payment, PaymentStatus};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};

/// Coarse transaction status as reported by the provider. Anything the
/// provider sends outside the three recognized values collapses into
/// `Other`, which keeps the mapping below exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
  Approved,
  Failed,
  Cancelled,
  Other,
}

impl ProviderStatus {
  /// Parses the raw status string from a webhook payload or a provider
  /// response. Comparison is case-insensitive; a missing status means the
  /// transaction is still in flight and parses as `Other`.
  pub fn parse(raw: Option<&str>) -> Self {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
      Some("approved") => ProviderStatus::Approved,
      Some("failed") => ProviderStatus::Failed,
      Some("cancelled") => ProviderStatus::Cancelled,
      _ => ProviderStatus::Other,
    }
  }
}

/// The pair of internal statuses a provider status maps to. Payment and
/// order status always travel together; writing one without the other is
/// what this type exists to prevent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMapping {
  pub payment: PaymentStatus,
  pub order: OrderStatus,
}

/// The status-mapping table. Unrecognized or missing provider statuses
/// leave both records PENDING so a later, definitive callback can still
/// settle them.
pub fn map_provider_status(status: ProviderStatus) -> StatusMapping {
  match status {
    ProviderStatus::Approved => StatusMapping {
      payment: PaymentStatus::Approved,
      order: OrderStatus::Confirmed,
    },
    ProviderStatus::Failed => StatusMapping {
      payment: PaymentStatus::Failed,
      order: OrderStatus::Cancelled,
    },
    ProviderStatus::Cancelled => StatusMapping {
      payment: PaymentStatus::Cancelled,
      order: OrderStatus::Cancelled,
    },
    ProviderStatus::Other => StatusMapping {
      payment: PaymentStatus::Pending,
      order: OrderStatus::Pending,
    },
  }
}

/// What a reconciliation pass will write: the mapped statuses, plus whether
/// this pass crosses into APPROVED and therefore owes the stock decrement.
/// The decrement fires only on the transition; replaying an already-approved
/// status is a no-op for stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOutcome {
  pub mapping: StatusMapping,
  pub decrement_stock: bool,
}

impl ReconcileOutcome {
  pub fn plan(incoming: ProviderStatus, current_payment_status: PaymentStatus) -> Self {
    let mapping = map_provider_status(incoming);
    let decrement_stock =
      mapping.payment == PaymentStatus::Approved && current_payment_status != PaymentStatus::Approved;
    ReconcileOutcome {
      mapping,
      decrement_stock,
    }
  }
}

/// Fields this application reads out of a provider webhook body. The rest of
/// the payload is opaque and stored verbatim as the Payment's metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookPayload {
  pub transaction_id: Option<String>,
  pub status: Option<String>,
}

impl WebhookPayload {
  /// Pulls the transaction reference and status out of an arbitrary JSON
  /// body. The provider names the id field `id` or `transaction_id`
  /// depending on the event shape, and serializes it as a string or a
  /// number depending on the API version.
  pub fn parse(body: &JsonValue) -> Self {
    let transaction_id = ["id", "transaction_id"].iter().find_map(|key| match body.get(*key) {
      Some(JsonValue::String(s)) if !s.is_empty() => Some(s.clone()),
      Some(JsonValue::Number(n)) => Some(n.to_string()),
      _ => None,
    });
    let status = body
      .get("status")
      .and_then(JsonValue::as_str)
      .map(|s| s.to_string());
    WebhookPayload { transaction_id, status }
  }
}

/// A payment and its order after a reconciliation pass.
#[derive(Debug, Clone)]
pub struct ReconciledTransaction {
  pub payment: Payment,
  pub order: Order,
}

/// Applies a provider status to the Payment/Order pair behind a transaction
/// id. Runs in a single database transaction with both rows locked, so
/// concurrent deliveries for the same transaction (webhook racing the
/// poller, or a provider retry) serialize instead of interleaving.
///
/// Returns `NotFound` when no Payment carries the transaction id; webhooks
/// never create records, they only update ones payment initiation wrote.
#[instrument(
  name = "reconcile::apply_transaction_status",
  skip(pool, metadata),
  fields(transaction_id = %transaction_id, incoming = ?incoming)
)]
pub async fn apply_transaction_status(
  pool: &PgPool,
  transaction_id: &str,
  incoming: ProviderStatus,
  metadata: &JsonValue,
) -> Result<ReconciledTransaction, AppError> {
  let mut tx = pool.begin().await?;

  let payment = sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE transaction_id = $1 FOR UPDATE")
    .bind(transaction_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
      warn!("Received status for a transaction this application never initiated.");
      AppError::NotFound(format!("No payment found for transaction '{}'.", transaction_id))
    })?;

  let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 FOR UPDATE")
    .bind(payment.order_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
      AppError::Internal(format!(
        "Payment {} references order {} which does not exist.",
        payment.id, payment.order_id
      ))
    })?;

  let outcome = ReconcileOutcome::plan(incoming, payment.status);
  debug!(
    previous = ?payment.status,
    mapped_payment = ?outcome.mapping.payment,
    mapped_order = ?outcome.mapping.order,
    decrement_stock = outcome.decrement_stock,
    "Planned reconciliation."
  );

  let payment = sqlx::query_as::<_, Payment>(
    "UPDATE payments SET status = $1, metadata = $2, updated_at = NOW() WHERE id = $3 RETURNING *",
  )
  .bind(outcome.mapping.payment)
  .bind(metadata)
  .bind(payment.id)
  .fetch_one(&mut *tx)
  .await?;

  // Order status and payment status move in one statement. Writing them
  // separately is how they drift apart.
  let order = sqlx::query_as::<_, Order>(
    "UPDATE orders SET status = $1, payment_status = $2, updated_at = NOW() WHERE id = $3 RETURNING *",
  )
  .bind(outcome.mapping.order)
  .bind(outcome.mapping.payment)
  .bind(order.id)
  .fetch_one(&mut *tx)
  .await?;

  if outcome.decrement_stock {
    let affected = sqlx::query(
      "UPDATE products \
       SET stock = products.stock - oi.quantity, updated_at = NOW() \
       FROM order_items oi \
       WHERE oi.order_id = $1 AND oi.product_id = products.id",
    )
    .bind(order.id)
    .execute(&mut *tx)
    .await?
    .rows_affected();
    debug!(order_id = %order.id, affected, "Decremented stock for approved order.");
  }

  tx.commit().await?;

  info!(
    order_id = %order.id,
    payment_status = ?payment.status,
    order_status = ?order.status,
    "Transaction status applied."
  );

  Ok(ReconciledTransaction { payment, order })
}

/// On-demand status poll: re-queries the provider for the transaction and
/// pushes the answer through the same apply path the webhook uses. The
/// fallback for buyers who return from checkout before the webhook lands.
#[instrument(name = "reconcile::poll_transaction_status", skip(pool, gateway))]
pub async fn poll_transaction_status(
  pool: &PgPool,
  gateway: &dyn PaymentGateway,
  transaction_id: &str,
) -> Result<PolledStatus, AppError> {
  let transaction = gateway.verify_transaction(transaction_id).await?;
  let incoming = ProviderStatus::parse(transaction.status.as_deref());
  let reconciled = apply_transaction_status(pool, transaction_id, incoming, &transaction.raw).await?;
  Ok(PolledStatus {
    transaction: transaction.raw,
    payment: reconciled.payment,
    order: reconciled.order,
  })
}

/// Result of a status poll: the provider's view of the transaction next to
/// the freshly reconciled local records.
#[derive(Debug, Clone)]
pub struct PolledStatus {
  pub transaction: JsonValue,
  pub payment: Payment,
  pub order: Order,
}
