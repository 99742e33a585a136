// tests/status_mapping_tests.rs

//! The provider-status mapping table, exercised through the public API.

use tokpa_api::gateway::GatewayTransaction;
use tokpa_api::models::{OrderStatus, PaymentStatus};
use tokpa_api::services::{map_provider_status, ProviderStatus, ReconcileOutcome, WebhookPayload};

use serde_json::json;

#[test]
fn every_provider_status_maps_to_its_paired_statuses() {
  let table = [
    ("approved", PaymentStatus::Approved, OrderStatus::Confirmed),
    ("failed", PaymentStatus::Failed, OrderStatus::Cancelled),
    ("cancelled", PaymentStatus::Cancelled, OrderStatus::Cancelled),
    ("unknown", PaymentStatus::Pending, OrderStatus::Pending),
  ];
  for (raw, expected_payment, expected_order) in table {
    let mapping = map_provider_status(ProviderStatus::parse(Some(raw)));
    assert_eq!(mapping.payment, expected_payment, "payment status for '{}'", raw);
    assert_eq!(mapping.order, expected_order, "order status for '{}'", raw);
  }
}

#[test]
fn a_missing_status_behaves_like_an_unknown_one() {
  let missing = map_provider_status(ProviderStatus::parse(None));
  let unknown = map_provider_status(ProviderStatus::parse(Some("something-new")));
  assert_eq!(missing, unknown);
  assert_eq!(missing.payment, PaymentStatus::Pending);
  assert_eq!(missing.order, OrderStatus::Pending);
}

// The webhook reads its status out of the callback payload, the poller out
// of the provider's transaction response. Both must land on the same
// internal statuses for the same provider status.
#[test]
fn webhook_and_poller_parse_provider_statuses_identically() {
  for raw in ["approved", "failed", "cancelled", "pending", "declined"] {
    let webhook = WebhookPayload::parse(&json!({ "id": "tx_1", "status": raw }));
    let polled = GatewayTransaction::from_response(json!({ "id": "tx_1", "status": raw })).unwrap();

    let from_webhook = ProviderStatus::parse(webhook.status.as_deref());
    let from_poll = ProviderStatus::parse(polled.status.as_deref());
    assert_eq!(from_webhook, from_poll, "paths diverged for '{}'", raw);
    assert_eq!(map_provider_status(from_webhook), map_provider_status(from_poll));
  }
}

#[test]
fn only_the_first_approval_plans_a_stock_decrement() {
  let first = ReconcileOutcome::plan(ProviderStatus::Approved, PaymentStatus::Pending);
  assert!(first.decrement_stock);

  // Redelivered webhook after the payment is already approved.
  let replay = ReconcileOutcome::plan(ProviderStatus::Approved, PaymentStatus::Approved);
  assert!(!replay.decrement_stock);
  assert_eq!(replay.mapping, first.mapping);
}

#[test]
fn approvals_after_a_failed_attempt_still_decrement() {
  let outcome = ReconcileOutcome::plan(ProviderStatus::Approved, PaymentStatus::Failed);
  assert!(outcome.decrement_stock);
}
