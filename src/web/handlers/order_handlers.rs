// src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::orders::{self, OrderItemInput};
use crate::state::AppState;
use crate::web::extractors::CurrentUser;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct CreateOrderRequestPayload {
  pub items: Vec<OrderItemInput>,
  pub address: String,
}

// --- Handler Implementations ---

#[instrument(
  name = "handler::create_order",
  skip(app_state, req_payload, current_user),
  fields(buyer_id = %current_user.0.id, item_count = req_payload.items.len())
)]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CreateOrderRequestPayload>,
  current_user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  let details = orders::create_order(
    &app_state.db_pool,
    &current_user.0,
    &req_payload.items,
    &req_payload.address,
  )
  .await?;

  info!(order_id = %details.order.id, "Order created.");
  Ok(HttpResponse::Created().json(json!({
    "message": "Order created successfully.",
    "order": details,
  })))
}

#[instrument(
  name = "handler::list_orders",
  skip(app_state, current_user),
  fields(buyer_id = %current_user.0.id)
)]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  current_user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  let orders = orders::list_orders(&app_state.db_pool, current_user.0.id).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}
