// src/lib.rs

//! Marketplace API: orders, payments against an external provider, and the
//! webhook/poll reconciliation that keeps both sides consistent.

pub mod config;
pub mod db;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod services;
pub mod state;
pub mod web;

pub use errors::{AppError, Result};
