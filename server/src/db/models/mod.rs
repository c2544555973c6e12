//! Entity Schemas
//!
//! Typed document definitions, enforced at write time through the
//! repository layer's typed collections.

pub mod brand;
pub mod counter;
pub mod order;
pub mod payment;
pub mod product;
pub mod user;

pub use brand::Brand;
pub use counter::{Counter, ORDER_NUMBER_COUNTER};
pub use order::{
    CustomerSnapshot, DeletedOrder, EditEntry, LineItem, Order, OrderStatus, PaymentStatus,
    PrintEntry,
};
pub use payment::{Payment, PaymentState};
pub use product::{Product, Review, StockEntry};
pub use user::{AccountStatus, PublicUser, Role, User, VirtualAccount};
