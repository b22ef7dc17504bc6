use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Cart mutation errors
#[derive(Debug, Error)]
pub enum CartError {
    #[error("Quantity must be a positive integer")]
    InvalidQuantity,

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Quantity exceeds available stock ({available})")]
    ExceedsStock { product_id: i64, available: i64 },

    #[error("Cart not found")]
    CartNotFound,

    #[error("Product not found in cart: {0}")]
    ItemNotFound(i64),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::InvalidQuantity => AppError::validation(err.to_string()),
            CartError::ProductNotFound(id) => {
                AppError::new(ErrorCode::ProductNotFound).with_detail("productId", id)
            }
            CartError::ExceedsStock {
                product_id,
                available,
            } => AppError::with_message(ErrorCode::QuantityExceedsStock, err.to_string())
                .with_detail("productId", product_id)
                .with_detail("available", available),
            CartError::CartNotFound => AppError::new(ErrorCode::CartNotFound),
            CartError::ItemNotFound(id) => {
                AppError::new(ErrorCode::CartItemNotFound).with_detail("productId", id)
            }
            CartError::Repo(e) => e.into(),
        }
    }
}
