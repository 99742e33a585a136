// src/services/orders.rs

//! Order creation and listing. Totals are always computed here from the
//! submitted line items; a client-supplied total is never trusted.

use crate::errors::AppError;
use crate::models::{Order, OrderItem, OrderStatus, Payment, PaymentStatus, User};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::{info, instrument};
use uuid::Uuid;

/// One cart line as submitted by the buyer. `price` is the unit price in
/// whole XOF francs, echoed from the product page; it is copied onto the
/// OrderItem so later price changes do not rewrite history.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
  pub id: Uuid,
  pub seller_id: Uuid,
  pub quantity: i32,
  pub price: i64,
}

/// An order together with its line items and payment attempts, the shape
/// every order-facing endpoint responds with.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderItem>,
  pub payments: Vec<Payment>,
}

/// Rejects empty carts, blank addresses, and nonsensical line items before
/// anything touches the database.
pub fn validate_order_input(items: &[OrderItemInput], address: &str) -> Result<(), AppError> {
  if items.is_empty() {
    return Err(AppError::Validation("Order must contain at least one item.".to_string()));
  }
  if address.trim().is_empty() {
    return Err(AppError::Validation("Delivery address is required.".to_string()));
  }
  for item in items {
    if item.quantity <= 0 {
      return Err(AppError::Validation(format!(
        "Quantity for product {} must be at least 1.",
        item.id
      )));
    }
    if item.price < 0 {
      return Err(AppError::Validation(format!(
        "Price for product {} cannot be negative.",
        item.id
      )));
    }
  }
  Ok(())
}

/// Server-side order total: Σ quantity × unit price, in whole francs.
pub fn order_total(items: &[OrderItemInput]) -> i64 {
  items.iter().map(|item| i64::from(item.quantity) * item.price).sum()
}

/// Creates an order and its line items in one database transaction; either
/// every row lands or none do.
#[instrument(name = "orders::create_order", skip(pool, buyer, items), fields(buyer_id = %buyer.id, item_count = items.len()))]
pub async fn create_order(
  pool: &PgPool,
  buyer: &User,
  items: &[OrderItemInput],
  address: &str,
) -> Result<OrderDetails, AppError> {
  validate_order_input(items, address)?;
  let total_amount = order_total(items);

  let mut tx = pool.begin().await?;

  let order = sqlx::query_as::<_, Order>(
    "INSERT INTO orders (id, buyer_id, address, status, payment_status, total_amount) \
     VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(buyer.id)
  .bind(address.trim())
  .bind(OrderStatus::Pending)
  .bind(PaymentStatus::Pending)
  .bind(total_amount)
  .fetch_one(&mut *tx)
  .await?;

  let mut order_items = Vec::with_capacity(items.len());
  for item in items {
    let row = sqlx::query_as::<_, OrderItem>(
      "INSERT INTO order_items (id, order_id, product_id, seller_id, quantity, unit_price) \
       VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(order.id)
    .bind(item.id)
    .bind(item.seller_id)
    .bind(item.quantity)
    .bind(item.price)
    .fetch_one(&mut *tx)
    .await?;
    order_items.push(row);
  }

  tx.commit().await?;

  info!(order_id = %order.id, total_amount, "Order created.");
  Ok(OrderDetails {
    order,
    items: order_items,
    payments: Vec::new(),
  })
}

/// All of a buyer's orders, newest first, each with its items and payment
/// attempts. Children are fetched in two batched queries rather than one
/// round trip per order.
#[instrument(name = "orders::list_orders", skip(pool))]
pub async fn list_orders(pool: &PgPool, buyer_id: Uuid) -> Result<Vec<OrderDetails>, AppError> {
  let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE buyer_id = $1 ORDER BY created_at DESC")
    .bind(buyer_id)
    .fetch_all(pool)
    .await?;

  if orders.is_empty() {
    return Ok(Vec::new());
  }
  let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();

  let items = sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = ANY($1)")
    .bind(&order_ids)
    .fetch_all(pool)
    .await?;
  let payments = sqlx::query_as::<_, Payment>(
    "SELECT * FROM payments WHERE order_id = ANY($1) ORDER BY created_at ASC",
  )
  .bind(&order_ids)
  .fetch_all(pool)
  .await?;

  let mut items_by_order: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
  for item in items {
    items_by_order.entry(item.order_id).or_default().push(item);
  }
  let mut payments_by_order: HashMap<Uuid, Vec<Payment>> = HashMap::new();
  for payment in payments {
    payments_by_order.entry(payment.order_id).or_default().push(payment);
  }

  Ok(
    orders
      .into_iter()
      .map(|order| {
        let items = items_by_order.remove(&order.id).unwrap_or_default();
        let payments = payments_by_order.remove(&order.id).unwrap_or_default();
        OrderDetails { order, items, payments }
      })
      .collect(),
  )
}

/// Looks up an order by id, scoped to its buyer. Orders are only ever
/// visible to the buyer who placed them.
pub async fn find_order_for_buyer(pool: &PgPool, order_id: Uuid, buyer_id: Uuid) -> Result<Order, AppError> {
  sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND buyer_id = $2")
    .bind(order_id)
    .bind(buyer_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order {} not found.", order_id)))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(quantity: i32, price: i64) -> OrderItemInput {
    OrderItemInput {
      id: Uuid::new_v4(),
      seller_id: Uuid::new_v4(),
      quantity,
      price,
    }
  }

  #[test]
  fn total_is_the_sum_of_quantity_times_unit_price() {
    let items = vec![item(2, 1000)];
    assert_eq!(order_total(&items), 2000);

    let items = vec![item(2, 1000), item(3, 450), item(1, 25)];
    assert_eq!(order_total(&items), 2000 + 1350 + 25);
  }

  #[test]
  fn empty_carts_are_rejected() {
    let err = validate_order_input(&[], "Cotonou, Rue 12").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }

  #[test]
  fn blank_addresses_are_rejected() {
    let items = vec![item(1, 500)];
    assert!(matches!(validate_order_input(&items, ""), Err(AppError::Validation(_))));
    assert!(matches!(validate_order_input(&items, "   "), Err(AppError::Validation(_))));
  }

  #[test]
  fn non_positive_quantities_are_rejected() {
    for quantity in [0, -1] {
      let items = vec![item(quantity, 500)];
      let err = validate_order_input(&items, "Cotonou, Rue 12").unwrap_err();
      assert!(matches!(err, AppError::Validation(_)), "quantity {}", quantity);
    }
  }

  #[test]
  fn negative_prices_are_rejected() {
    let items = vec![item(1, -10)];
    let err = validate_order_input(&items, "Cotonou, Rue 12").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }

  #[test]
  fn a_valid_cart_passes_validation() {
    let items = vec![item(2, 1000), item(1, 0)];
    assert!(validate_order_input(&items, "Cotonou, Rue 12").is_ok());
  }
}
