//! Core domain types
//!
//! - Actors: users with a role, identified by typed ids
//! - Products: the tracked units, with a public opaque identifier
//! - Transfer log entries: append-only custody records
//! - Orders: purchase intents, independent of custody

pub mod actor;
pub mod order;
pub mod product;
pub mod transfer;

pub use actor::{Role, User, UserId};
pub use order::{Order, OrderId, ORDER_STATUS_DELIVERED, ORDER_STATUS_PROCESSING};
pub use product::{Product, ProductId};
pub use transfer::{LogId, TransferAction, TransferLogEntry};
