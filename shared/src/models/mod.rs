//! Data models
//!
//! Shared between shop-server and its clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod cart;
pub mod order;
pub mod product;
pub mod report;
pub mod user;

// Re-exports
pub use cart::*;
pub use order::*;
pub use product::*;
pub use report::*;
pub use user::*;
