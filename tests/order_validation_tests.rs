// tests/order_validation_tests.rs

//! Order input validation and server-side totals.

use tokpa_api::errors::AppError;
use tokpa_api::services::orders::{order_total, validate_order_input, OrderItemInput};

use uuid::Uuid;

fn line(quantity: i32, price: i64) -> OrderItemInput {
  OrderItemInput {
    id: Uuid::new_v4(),
    seller_id: Uuid::new_v4(),
    quantity,
    price,
  }
}

#[test]
fn totals_are_computed_from_the_line_items() {
  assert_eq!(order_total(&[line(2, 1000)]), 2000);
  assert_eq!(order_total(&[line(1, 0)]), 0);
  assert_eq!(order_total(&[line(2, 1000), line(3, 450), line(10, 25)]), 3600);
}

#[test]
fn totals_survive_large_quantities_without_overflowing_i32() {
  // 3_000_000 francs × 1000 units exceeds i32 but not i64.
  assert_eq!(order_total(&[line(1000, 3_000_000)]), 3_000_000_000);
}

#[test]
fn an_empty_cart_is_a_validation_error() {
  let err = validate_order_input(&[], "Cotonou, Rue 12").unwrap_err();
  assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn a_missing_address_is_a_validation_error() {
  for address in ["", "   ", "\t\n"] {
    let err = validate_order_input(&[line(1, 500)], address).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "address {:?}", address);
  }
}

#[test]
fn bad_line_items_are_validation_errors() {
  let zero_quantity = validate_order_input(&[line(0, 500)], "Cotonou, Rue 12").unwrap_err();
  assert!(matches!(zero_quantity, AppError::Validation(_)));

  let negative_price = validate_order_input(&[line(1, -500)], "Cotonou, Rue 12").unwrap_err();
  assert!(matches!(negative_price, AppError::Validation(_)));

  // One bad line poisons the whole order.
  let mixed = validate_order_input(&[line(2, 1000), line(-1, 500)], "Cotonou, Rue 12").unwrap_err();
  assert!(matches!(mixed, AppError::Validation(_)));
}

#[test]
fn the_example_cart_checks_out() {
  let items = [line(2, 1000)];
  assert!(validate_order_input(&items, "Cotonou, Rue 12").is_ok());
  assert_eq!(order_total(&items), 2000);
}
