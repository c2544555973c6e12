//! Order lifecycle module
//!
//! - [`number`] - sequential order-number allocation
//! - [`service`] - creation, listing, print/edit history, soft delete

pub mod number;
pub mod service;

pub use number::{CHECKOUT_BASE, LEGACY_BASE, ORDER_PREFIX, OrderNumberAllocator};
pub use service::{NewLineItem, NewOrder, OrderPatch, OrderService};
