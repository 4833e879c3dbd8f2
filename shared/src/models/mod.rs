//! Data models
//!
//! Shared between the shop server and its clients (via API).
//! All documents serialize as camelCase JSON; all IDs are `i64` snowflakes.

pub mod admin;
pub mod customer;
pub mod menu_item;
pub mod reward;

// Re-exports
pub use admin::*;
pub use customer::*;
pub use menu_item::*;
pub use reward::*;
