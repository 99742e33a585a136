// src/gateway/http.rs

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::gateway::{CreateTransactionRequest, GatewayTransaction, PaymentGateway};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::instrument;

/// REST client for the payment provider. All calls carry the merchant
/// secret key as a bearer token.
pub struct HttpPaymentGateway {
  client: Client,
  base_url: String,
  pay_base_url: String,
  secret_key: String,
}

impl HttpPaymentGateway {
  pub fn from_config(config: &AppConfig) -> Self {
    Self {
      client: Client::new(),
      base_url: config.gateway_base_url.trim_end_matches('/').to_string(),
      pay_base_url: config.gateway_pay_base_url.trim_end_matches('/').to_string(),
      secret_key: config.gateway_secret_key.clone(),
    }
  }

  async fn execute(&self, request: reqwest::RequestBuilder, context: &str) -> Result<GatewayTransaction, AppError> {
    let response = request
      .bearer_auth(&self.secret_key)
      .send()
      .await
      .map_err(|e| AppError::Provider(format!("Gateway request failed ({}): {}", context, e)))?;

    let status = response.status();
    let body: JsonValue = response
      .json()
      .await
      .map_err(|e| AppError::Provider(format!("Gateway returned a non-JSON body ({}): {}", context, e)))?;

    if !status.is_success() {
      return Err(AppError::Provider(format!(
        "Gateway rejected {} with HTTP {}: {}",
        context, status, body
      )));
    }

    GatewayTransaction::from_response(body)
  }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
  #[instrument(name = "gateway::create_transaction", skip(self, request), fields(amount = request.amount))]
  async fn create_transaction(&self, request: &CreateTransactionRequest) -> Result<GatewayTransaction, AppError> {
    let url = format!("{}/transactions", self.base_url);
    self
      .execute(self.client.post(&url).json(request), "transaction create")
      .await
  }

  #[instrument(name = "gateway::verify_transaction", skip(self))]
  async fn verify_transaction(&self, transaction_id: &str) -> Result<GatewayTransaction, AppError> {
    let url = format!("{}/transactions/{}", self.base_url, transaction_id);
    self.execute(self.client.get(&url), "transaction verify").await
  }

  #[instrument(name = "gateway::cancel_transaction", skip(self))]
  async fn cancel_transaction(&self, transaction_id: &str) -> Result<GatewayTransaction, AppError> {
    let url = format!("{}/transactions/{}/cancel", self.base_url, transaction_id);
    self
      .execute(self.client.post(&url).json(&JsonValue::Null), "transaction cancel")
      .await
  }

  fn payment_url(&self, transaction_id: &str) -> String {
    format!("{}/pay/{}", self.pay_base_url, transaction_id)
  }
}
