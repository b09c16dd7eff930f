//! Duka - Kenyan Toy Shop Backend
//!
//! Two-sided e-commerce backend: a customer storefront and an admin
//! back office sharing one document store.
//!
//! ## Features
//! - Product catalog with variations and sale pricing
//! - Per-user shopping cart and cash-on-delivery checkout
//! - Admin order workflow with stock pick and status emails
//! - Saved address book, snapshotted onto each order
//! - County > sub-county > location delivery-fee directory

pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod notify;
pub mod seed;
pub mod store;
pub mod workflow;

pub use error::{ApiError, ApiResult};
