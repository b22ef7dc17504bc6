//! Order engine
//!
//! - [`engine`] - validate-then-commit order placement
//! - [`money`] - decimal arithmetic for prices and totals

pub mod engine;
mod error;
pub mod money;

pub use engine::{get_order, list_orders, place_order};
pub use error::OrderError;
