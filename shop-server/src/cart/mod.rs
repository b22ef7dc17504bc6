//! Cart store
//!
//! One cart per user, created lazily on the first add. Stock checks made
//! here are advisory: checkout re-validates against live stock.

mod error;
mod service;

pub use error::CartError;
pub use service::{add_item, build_view, get_cart, remove_item};
