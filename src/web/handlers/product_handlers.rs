// src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Product;
use crate::state::AppState;
use crate::web::extractors::CurrentUser;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct CreateProductRequestPayload {
  pub name: String,
  pub description: Option<String>,
  pub price: i64,
  pub stock: i32,
}

// --- Handler Implementations ---

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products: Vec<Product> = sqlx::query_as("SELECT * FROM products ORDER BY name ASC")
    .fetch_all(&app_state.db_pool)
    .await?;

  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
    .bind(product_id)
    .fetch_optional(&app_state.db_pool)
    .await?;

  match product {
    Some(product) => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
    None => {
      warn!("Product {} not found.", product_id);
      Err(AppError::NotFound(format!("Product {} not found.", product_id)))
    }
  }
}

#[instrument(
  name = "handler::create_product",
  skip(app_state, req_payload, current_user),
  fields(seller_id = %current_user.0.id, product_name = %req_payload.name)
)]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CreateProductRequestPayload>,
  current_user: CurrentUser,
) -> Result<HttpResponse, AppError> {
  current_user.require_catalog_access()?;

  if req_payload.name.trim().is_empty() {
    return Err(AppError::Validation("Product name is required.".to_string()));
  }
  if req_payload.price < 0 {
    return Err(AppError::Validation("Product price cannot be negative.".to_string()));
  }
  if req_payload.stock < 0 {
    return Err(AppError::Validation("Product stock cannot be negative.".to_string()));
  }

  let product: Product = sqlx::query_as(
    "INSERT INTO products (id, seller_id, name, description, price, stock) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(current_user.0.id)
  .bind(req_payload.name.trim())
  .bind(req_payload.description.as_deref())
  .bind(req_payload.price)
  .bind(req_payload.stock)
  .fetch_one(&app_state.db_pool)
  .await?;

  info!(product_id = %product.id, "Product created.");
  Ok(HttpResponse::Created().json(json!({
    "message": "Product created successfully.",
    "product": product,
  })))
}
