// src/state.rs
use crate::config::AppConfig;
use crate::gateway::PaymentGateway;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
  pub db_pool: PgPool,
  pub config: Arc<AppConfig>,
  pub gateway: Arc<dyn PaymentGateway>,
}
