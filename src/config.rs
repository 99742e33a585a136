// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

/// Which payment-gateway environment the server talks to. Sandbox and live
/// differ in base URLs and credentials; the flag is also echoed in logs so an
/// operator can tell at a glance which money is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayEnvironment {
  Sandbox,
  Live,
}

impl GatewayEnvironment {
  pub fn as_str(&self) -> &'static str {
    match self {
      GatewayEnvironment::Sandbox => "sandbox",
      GatewayEnvironment::Live => "live",
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  /// Public base URL of this API, used to build the webhook callback URL and
  /// the default post-payment return URL.
  pub app_base_url: String,

  // Payment gateway settings
  pub gateway_base_url: String,
  /// Base of the provider-hosted checkout pages; the payment URL handed to
  /// clients is `{gateway_pay_base_url}/pay/{transaction_id}`.
  pub gateway_pay_base_url: String,
  pub gateway_public_key: String,
  pub gateway_secret_key: String,
  pub gateway_environment: GatewayEnvironment,
  /// When set, `POST /payments/webhook` requires an `x-webhook-signature`
  /// header equal to this value. When unset, callbacks are accepted as-is.
  pub gateway_webhook_secret: Option<String>,

  /// Seed demo data (admin account + a few products) on startup.
  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

    let gateway_environment = match get_env("GATEWAY_ENVIRONMENT")
      .unwrap_or_else(|_| "sandbox".to_string())
      .to_lowercase()
      .as_str()
    {
      "live" => GatewayEnvironment::Live,
      "sandbox" => GatewayEnvironment::Sandbox,
      other => {
        return Err(AppError::Config(format!(
          "Invalid GATEWAY_ENVIRONMENT '{}': expected 'sandbox' or 'live'",
          other
        )))
      }
    };
    // Defaults follow the environment flag; both can be overridden explicitly.
    let default_api_base = match gateway_environment {
      GatewayEnvironment::Sandbox => "https://sandbox-api.payfeda.example/v1",
      GatewayEnvironment::Live => "https://api.payfeda.example/v1",
    };
    let default_pay_base = match gateway_environment {
      GatewayEnvironment::Sandbox => "https://sandbox-checkout.payfeda.example",
      GatewayEnvironment::Live => "https://checkout.payfeda.example",
    };
    let gateway_base_url = get_env("GATEWAY_BASE_URL").unwrap_or_else(|_| default_api_base.to_string());
    let gateway_pay_base_url = get_env("GATEWAY_PAY_BASE_URL").unwrap_or_else(|_| default_pay_base.to_string());
    let gateway_public_key = get_env("GATEWAY_PUBLIC_KEY")?;
    let gateway_secret_key = get_env("GATEWAY_SECRET_KEY")?;
    let gateway_webhook_secret = env::var("GATEWAY_WEBHOOK_SECRET").ok().filter(|s| !s.is_empty());

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!(
      gateway_environment = gateway_environment.as_str(),
      "Application configuration loaded successfully."
    );

    Ok(Self {
      server_host,
      server_port,
      database_url,
      app_base_url,
      gateway_base_url,
      gateway_pay_base_url,
      gateway_public_key,
      gateway_secret_key,
      gateway_environment,
      gateway_webhook_secret,
      seed_db,
    })
  }

  /// Callback URL the provider posts transaction updates to.
  pub fn webhook_url(&self) -> String {
    format!("{}/payments/webhook", self.app_base_url.trim_end_matches('/'))
  }

  /// Where the provider sends the buyer after checkout when the client did
  /// not ask for a specific page.
  pub fn default_return_url(&self, order_id: uuid::Uuid) -> String {
    format!("{}/orders/{}", self.app_base_url.trim_end_matches('/'), order_id)
  }
}
