use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Order placement errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("A product in the cart no longer exists")]
    ProductGone { product_id: i64 },

    #[error("Insufficient stock for product: {name}")]
    InsufficientStock { product_id: i64, name: String },

    #[error("Order not found: {0}")]
    NotFound(i64),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Repo(err.into())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => AppError::new(ErrorCode::CartEmpty),
            OrderError::ProductGone { product_id } => {
                AppError::new(ErrorCode::ProductGone).with_detail("productId", product_id)
            }
            OrderError::InsufficientStock { product_id, .. } => {
                AppError::with_message(ErrorCode::InsufficientStock, err.to_string())
                    .with_detail("productId", product_id)
            }
            OrderError::NotFound(id) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("orderId", id)
            }
            OrderError::Repo(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_order_error_mapping() {
        let err: AppError = OrderError::InsufficientStock {
            product_id: 5,
            name: "Lamp".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.message, "Insufficient stock for product: Lamp");
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);

        let err: AppError = OrderError::EmptyCart.into();
        assert_eq!(err.message, "Cart is empty");

        let err: AppError = OrderError::ProductGone { product_id: 1 }.into();
        assert_eq!(err.code, ErrorCode::ProductGone);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }
}
