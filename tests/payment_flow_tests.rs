// tests/payment_flow_tests.rs

//! The payment lifecycle from order to settled webhook, walked through the
//! pure seams of each stage: request building, provider response parsing,
//! webhook parsing, and reconciliation planning.

use tokpa_api::config::{AppConfig, GatewayEnvironment};
use tokpa_api::errors::AppError;
use tokpa_api::gateway::GatewayTransaction;
use tokpa_api::models::{Order, OrderStatus, PaymentStatus, Role, User};
use tokpa_api::services::orders::{order_total, OrderItemInput};
use tokpa_api::services::payments::{build_transaction_request, ensure_payable};
use tokpa_api::services::{map_provider_status, ProviderStatus, ReconcileOutcome, WebhookPayload};

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

fn config() -> AppConfig {
  AppConfig {
    server_host: "127.0.0.1".to_string(),
    server_port: 8080,
    database_url: "postgres://localhost/tokpa_test".to_string(),
    app_base_url: "https://api.tokpa.example".to_string(),
    gateway_base_url: "https://sandbox-api.payfeda.example/v1".to_string(),
    gateway_pay_base_url: "https://sandbox-checkout.payfeda.example".to_string(),
    gateway_public_key: "pk_sandbox_x".to_string(),
    gateway_secret_key: "sk_sandbox_x".to_string(),
    gateway_environment: GatewayEnvironment::Sandbox,
    gateway_webhook_secret: None,
    seed_db: false,
  }
}

fn buyer() -> User {
  let now = Utc::now();
  User {
    id: Uuid::new_v4(),
    email: "fifa@example.com".to_string(),
    password_hash: "irrelevant".to_string(),
    first_name: "Fifa".to_string(),
    last_name: "Agbo".to_string(),
    role: Role::Buyer,
    created_at: now,
    updated_at: now,
  }
}

fn pending_order(total_amount: i64) -> Order {
  let now = Utc::now();
  Order {
    id: Uuid::new_v4(),
    buyer_id: Uuid::new_v4(),
    address: "Cotonou, Rue 12".to_string(),
    status: OrderStatus::Pending,
    payment_status: PaymentStatus::Pending,
    total_amount,
    transaction_id: None,
    created_at: now,
    updated_at: now,
  }
}

#[test]
fn a_payment_settles_end_to_end() {
  // A cart of two 1000-franc items totals 2000 francs.
  let items = [OrderItemInput {
    id: Uuid::new_v4(),
    seller_id: Uuid::new_v4(),
    quantity: 2,
    price: 1000,
  }];
  let total = order_total(&items);
  assert_eq!(total, 2000);

  // The pending order is payable and produces a provider request in minor
  // units with the webhook as callback.
  let order = pending_order(total);
  ensure_payable(&order).unwrap();
  let request = build_transaction_request(&order, &buyer(), &config(), None);
  assert_eq!(request.amount, 200_000);
  assert_eq!(request.currency, "XOF");
  assert_eq!(request.callback_url, "https://api.tokpa.example/payments/webhook");

  // The provider acknowledges with a pending transaction.
  let created = GatewayTransaction::from_response(json!({
    "id": "tx_abc",
    "status": "pending",
    "amount": 200_000
  }))
  .unwrap();
  assert_eq!(created.id, "tx_abc");

  // Later, the approval webhook arrives for that transaction.
  let callback = json!({ "id": "tx_abc", "status": "approved" });
  let payload = WebhookPayload::parse(&callback);
  assert_eq!(payload.transaction_id.as_deref(), Some("tx_abc"));

  let incoming = ProviderStatus::parse(payload.status.as_deref());
  let outcome = ReconcileOutcome::plan(incoming, PaymentStatus::Pending);
  assert_eq!(outcome.mapping.payment, PaymentStatus::Approved);
  assert_eq!(outcome.mapping.order, OrderStatus::Confirmed);
  assert!(outcome.decrement_stock, "first approval must release the stock decrement");

  // The provider redelivers the same webhook; stock must not move again.
  let replay = ReconcileOutcome::plan(incoming, outcome.mapping.payment);
  assert_eq!(replay.mapping, outcome.mapping);
  assert!(!replay.decrement_stock, "replayed approval must not double-decrement");
}

#[test]
fn an_approved_order_refuses_a_second_payment() {
  let mut order = pending_order(2000);
  order.payment_status = PaymentStatus::Approved;
  order.status = OrderStatus::Confirmed;

  let err = ensure_payable(&order).unwrap_err();
  assert!(matches!(err, AppError::AlreadyPaid(_)));
}

#[test]
fn a_failed_transaction_cancels_the_order_without_touching_stock() {
  let callback = json!({ "transaction_id": "tx_ko", "status": "failed" });
  let payload = WebhookPayload::parse(&callback);
  let incoming = ProviderStatus::parse(payload.status.as_deref());

  let outcome = ReconcileOutcome::plan(incoming, PaymentStatus::Pending);
  assert_eq!(outcome.mapping.payment, PaymentStatus::Failed);
  assert_eq!(outcome.mapping.order, OrderStatus::Cancelled);
  assert!(!outcome.decrement_stock);

  // A failed attempt leaves the order payable for a retry.
  let order = pending_order(2000);
  assert!(ensure_payable(&order).is_ok());
  assert_eq!(map_provider_status(ProviderStatus::Failed).payment, PaymentStatus::Failed);
}
