// src/services/payments.rs

//! Payment initiation and management against the external gateway.

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::gateway::{CreateTransactionRequest, CustomerInfo, PaymentGateway};
use crate::models::{Order, Payment, PaymentStatus, User};
use crate::services::orders::find_order_for_buyer;
use crate::services::reconcile::{apply_transaction_status, ProviderStatus, ReconciledTransaction};
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Everything payment initiation hands back to the client: where to send
/// the buyer, plus the rows that were written.
#[derive(Debug, Clone)]
pub struct InitiatedPayment {
  pub transaction_id: String,
  pub payment_url: String,
  pub transaction: JsonValue,
  pub payment: Payment,
  pub order: Order,
}

/// Idempotency guard: an order whose payment already went through cannot be
/// paid again.
pub fn ensure_payable(order: &Order) -> Result<(), AppError> {
  if order.payment_status == PaymentStatus::Approved {
    return Err(AppError::AlreadyPaid(format!("Order {} is already paid.", order.id)));
  }
  Ok(())
}

/// Assembles the provider transaction request for an order. The provider
/// expects amounts in minor units, so the whole-franc total is multiplied
/// by 100 here and nowhere else.
pub fn build_transaction_request(
  order: &Order,
  buyer: &User,
  config: &AppConfig,
  return_url: Option<&str>,
) -> CreateTransactionRequest {
  CreateTransactionRequest {
    description: format!("Order {} for {}", order.id, buyer.full_name()),
    amount: order.total_amount * 100,
    currency: "XOF".to_string(),
    callback_url: config.webhook_url(),
    return_url: return_url
      .map(|u| u.to_string())
      .unwrap_or_else(|| config.default_return_url(order.id)),
    customer: CustomerInfo {
      email: buyer.email.clone(),
      firstname: buyer.first_name.clone(),
      lastname: buyer.last_name.clone(),
    },
  }
}

/// Creates a provider transaction for an order and records it locally. The
/// order's transaction reference and the Payment row are written in one
/// database transaction: the order never points at a transaction that has
/// no Payment behind it.
#[instrument(
  name = "payments::initiate_payment",
  skip(pool, gateway, config, buyer, return_url),
  fields(buyer_id = %buyer.id, order_id = %order_id)
)]
pub async fn initiate_payment(
  pool: &PgPool,
  gateway: &dyn PaymentGateway,
  config: &AppConfig,
  buyer: &User,
  order_id: Uuid,
  return_url: Option<&str>,
) -> Result<InitiatedPayment, AppError> {
  let order = find_order_for_buyer(pool, order_id, buyer.id).await?;
  ensure_payable(&order)?;

  let request = build_transaction_request(&order, buyer, config, return_url);
  let transaction = gateway.create_transaction(&request).await?;
  let payment_url = gateway.payment_url(&transaction.id);

  let mut tx = pool.begin().await?;
  let order = sqlx::query_as::<_, Order>(
    "UPDATE orders SET transaction_id = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
  )
  .bind(&transaction.id)
  .bind(order.id)
  .fetch_one(&mut *tx)
  .await?;
  let payment = sqlx::query_as::<_, Payment>(
    "INSERT INTO payments (id, order_id, transaction_id, amount, currency, status, metadata) \
     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(order.id)
  .bind(&transaction.id)
  .bind(order.total_amount)
  .bind("XOF")
  .bind(PaymentStatus::Pending)
  .bind(&transaction.raw)
  .fetch_one(&mut *tx)
  .await?;
  tx.commit().await?;

  info!(transaction_id = %transaction.id, "Payment initiated.");
  Ok(InitiatedPayment {
    transaction_id: transaction.id,
    payment_url,
    transaction: transaction.raw,
    payment,
    order,
  })
}

/// A buyer's payment attempts, optionally narrowed to one order. Payments
/// are reached through their orders, so other buyers' rows are never
/// visible here.
#[instrument(name = "payments::list_payments", skip(pool))]
pub async fn list_payments(pool: &PgPool, buyer_id: Uuid, order_id: Option<Uuid>) -> Result<Vec<Payment>, AppError> {
  let payments = match order_id {
    Some(order_id) => {
      sqlx::query_as::<_, Payment>(
        "SELECT p.* FROM payments p \
         JOIN orders o ON o.id = p.order_id \
         WHERE o.buyer_id = $1 AND p.order_id = $2 \
         ORDER BY p.created_at DESC",
      )
      .bind(buyer_id)
      .bind(order_id)
      .fetch_all(pool)
      .await?
    }
    None => {
      sqlx::query_as::<_, Payment>(
        "SELECT p.* FROM payments p \
         JOIN orders o ON o.id = p.order_id \
         WHERE o.buyer_id = $1 \
         ORDER BY p.created_at DESC",
      )
      .bind(buyer_id)
      .fetch_all(pool)
      .await?
    }
  };
  Ok(payments)
}

/// Cancels a pending transaction at the provider, then reconciles whatever
/// status the provider answers with. Scoped to the requesting buyer.
#[instrument(name = "payments::cancel_payment", skip(pool, gateway), fields(buyer_id = %buyer_id))]
pub async fn cancel_payment(
  pool: &PgPool,
  gateway: &dyn PaymentGateway,
  buyer_id: Uuid,
  transaction_id: &str,
) -> Result<ReconciledTransaction, AppError> {
  let owned = sqlx::query_as::<_, Payment>(
    "SELECT p.* FROM payments p \
     JOIN orders o ON o.id = p.order_id \
     WHERE p.transaction_id = $1 AND o.buyer_id = $2",
  )
  .bind(transaction_id)
  .bind(buyer_id)
  .fetch_optional(pool)
  .await?;
  if owned.is_none() {
    warn!("Cancel requested for a transaction outside the buyer's orders.");
    return Err(AppError::NotFound(format!(
      "No payment found for transaction '{}'.",
      transaction_id
    )));
  }

  let transaction = gateway.cancel_transaction(transaction_id).await?;
  let incoming = ProviderStatus::parse(transaction.status.as_deref());
  apply_transaction_status(pool, transaction_id, incoming, &transaction.raw).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::GatewayEnvironment;
  use crate::models::{OrderStatus, Role};
  use chrono::Utc;

  fn test_config() -> AppConfig {
    AppConfig {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: "postgres://localhost/test".to_string(),
      app_base_url: "http://localhost:8080".to_string(),
      gateway_base_url: "https://sandbox-api.payfeda.example/v1".to_string(),
      gateway_pay_base_url: "https://sandbox-checkout.payfeda.example".to_string(),
      gateway_public_key: "pk_sandbox_x".to_string(),
      gateway_secret_key: "sk_sandbox_x".to_string(),
      gateway_environment: GatewayEnvironment::Sandbox,
      gateway_webhook_secret: None,
      seed_db: false,
    }
  }

  fn order_with_payment_status(status: PaymentStatus) -> Order {
    let now = Utc::now();
    Order {
      id: Uuid::new_v4(),
      buyer_id: Uuid::new_v4(),
      address: "Cotonou, Rue 12".to_string(),
      status: OrderStatus::Pending,
      payment_status: status,
      total_amount: 2000,
      transaction_id: None,
      created_at: now,
      updated_at: now,
    }
  }

  fn buyer() -> User {
    let now = Utc::now();
    User {
      id: Uuid::new_v4(),
      email: "ayo@example.com".to_string(),
      password_hash: "hash".to_string(),
      first_name: "Ayo".to_string(),
      last_name: "Dossou".to_string(),
      role: Role::Buyer,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn approved_orders_cannot_be_paid_again() {
    let order = order_with_payment_status(PaymentStatus::Approved);
    let err = ensure_payable(&order).unwrap_err();
    assert!(matches!(err, AppError::AlreadyPaid(_)));
  }

  #[test]
  fn unsettled_orders_remain_payable() {
    for status in [PaymentStatus::Pending, PaymentStatus::Failed, PaymentStatus::Cancelled] {
      let order = order_with_payment_status(status);
      assert!(ensure_payable(&order).is_ok(), "status {:?}", status);
    }
  }

  #[test]
  fn transaction_request_converts_to_minor_units() {
    let order = order_with_payment_status(PaymentStatus::Pending);
    let request = build_transaction_request(&order, &buyer(), &test_config(), None);
    assert_eq!(request.amount, 200_000);
    assert_eq!(request.currency, "XOF");
  }

  #[test]
  fn transaction_request_carries_buyer_and_urls() {
    let order = order_with_payment_status(PaymentStatus::Pending);
    let request = build_transaction_request(&order, &buyer(), &test_config(), None);
    assert_eq!(request.customer.email, "ayo@example.com");
    assert_eq!(request.customer.firstname, "Ayo");
    assert_eq!(request.customer.lastname, "Dossou");
    assert_eq!(request.callback_url, "http://localhost:8080/payments/webhook");
    assert_eq!(request.return_url, format!("http://localhost:8080/orders/{}", order.id));
  }

  #[test]
  fn an_explicit_return_url_wins_over_the_default() {
    let order = order_with_payment_status(PaymentStatus::Pending);
    let request = build_transaction_request(&order, &buyer(), &test_config(), Some("https://shop.example/done"));
    assert_eq!(request.return_url, "https://shop.example/done");
  }
}
