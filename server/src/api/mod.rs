//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness probe
//! - [`auth`] - signup, login, session, single-use token flows
//! - [`users`] - account admin (admin only)
//! - [`products`] - catalog, reviews, stock
//! - [`brands`] - brand catalog
//! - [`orders`] - order lifecycle
//! - [`admin_logs`] - audit trail reads (admin only)
//! - [`checkout`] - payment gateway delegation
//! - [`whatsapp`] - messaging provider delegation

pub mod admin_logs;
pub mod auth;
pub mod brands;
pub mod checkout;
pub mod health;
pub mod orders;
pub mod products;
pub mod users;
pub mod whatsapp;
