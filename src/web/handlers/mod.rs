// src/web/handlers/mod.rs

// Declare handler modules
pub mod auth_handlers;
pub mod order_handlers;
pub mod payment_handlers;
pub mod product_handlers;
pub mod webhook_handlers;
