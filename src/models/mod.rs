// src/models/mod.rs

//! Data structures representing database entities.

pub mod order;
pub mod order_item;
pub mod payment;
pub mod product;
pub mod user;

// Re-export the model structs for convenient access
pub use order::{Order, OrderStatus, PaymentStatus};
pub use order_item::OrderItem;
pub use payment::Payment;
pub use product::Product;
pub use user::{Role, User};
