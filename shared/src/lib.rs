//! Shared types for the storefront
//!
//! Wire types used by the server and its clients: error codes,
//! the response envelope, domain models and pagination.

pub mod error;
pub mod models;
pub mod pagination;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use pagination::{PaginatedResponse, Pagination};
