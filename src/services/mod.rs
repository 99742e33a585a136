// src/services/mod.rs

//! Business logic behind the HTTP handlers: order assembly, payment
//! initiation against the gateway, and transaction-status reconciliation.

pub mod auth;
pub mod orders;
pub mod payments;
pub mod reconcile;

pub use reconcile::{
  apply_transaction_status, map_provider_status, poll_transaction_status, PolledStatus, ProviderStatus,
  ReconcileOutcome, ReconciledTransaction, StatusMapping, WebhookPayload,
};
