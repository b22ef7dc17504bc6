//! Unified error codes for the storefront
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Cart errors
//! - 4xxx: Order errors
//! - 5xxx: Product errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a plain `u16` so clients can switch on the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Username already taken
    UsernameExists = 1005,

    // ==================== 2xxx: Permission ====================
    /// Admin role required
    AdminRequired = 2002,

    // ==================== 3xxx: Cart ====================
    /// User has no cart
    CartNotFound = 3001,
    /// Product is not in the cart
    CartItemNotFound = 3002,
    /// Requested quantity is above the product's stock
    QuantityExceedsStock = 3003,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Cart is empty at checkout
    CartEmpty = 4002,
    /// A line cannot be satisfied by current stock
    InsufficientStock = 4003,
    /// A product referenced by the cart was deleted
    ProductGone = 4004,

    // ==================== 5xxx: Product ====================
    /// Product not found
    ProductNotFound = 5001,
    /// Invalid price
    ProductInvalidPrice = 5002,
    /// Invalid stock value
    ProductInvalidStock = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Request exceeded the configured timeout
    TimeoutError = 9004,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default English message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field missing",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid username or password",
            Self::TokenExpired => "Token has expired",
            Self::TokenInvalid => "Invalid token",
            Self::UsernameExists => "Username already exists",

            Self::AdminRequired => "Forbidden: admin access required",

            Self::CartNotFound => "Cart not found",
            Self::CartItemNotFound => "Product not found in cart",
            Self::QuantityExceedsStock => "Quantity exceeds available stock",

            Self::OrderNotFound => "Order not found",
            Self::CartEmpty => "Cart is empty",
            Self::InsufficientStock => "Insufficient stock",
            Self::ProductGone => "A product in the cart no longer exists",

            Self::ProductNotFound => "Product not found",
            Self::ProductInvalidPrice => "Price must be a non-negative number",
            Self::ProductInvalidStock => "Stock must be a non-negative integer",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::TimeoutError => "Request timed out",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Returned when a `u16` does not name a known [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            7 => Self::RequiredField,

            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,
            1005 => Self::UsernameExists,

            2002 => Self::AdminRequired,

            3001 => Self::CartNotFound,
            3002 => Self::CartItemNotFound,
            3003 => Self::QuantityExceedsStock,

            4001 => Self::OrderNotFound,
            4002 => Self::CartEmpty,
            4003 => Self::InsufficientStock,
            4004 => Self::ProductGone,

            5001 => Self::ProductNotFound,
            5002 => Self::ProductInvalidPrice,
            5003 => Self::ProductInvalidStock,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9004 => Self::TimeoutError,

            _ => return Err(InvalidErrorCode(value)),
        };
        Ok(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2002);
        assert_eq!(ErrorCode::CartItemNotFound.code(), 3002);
        assert_eq!(ErrorCode::InsufficientStock.code(), 4003);
        assert_eq!(ErrorCode::ProductNotFound.code(), 5001);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
        assert_eq!(ErrorCode::TimeoutError.code(), 9004);
    }

    #[test]
    fn test_try_from_known_and_unknown() {
        assert_eq!(ErrorCode::try_from(4002), Ok(ErrorCode::CartEmpty));
        assert_eq!(ErrorCode::try_from(1005), Ok(ErrorCode::UsernameExists));
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
        assert_eq!(ErrorCode::try_from(0), Err(InvalidErrorCode(0)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::ProductGone).unwrap();
        assert_eq!(json, "4004");

        let code: ErrorCode = serde_json::from_str("3003").unwrap();
        assert_eq!(code, ErrorCode::QuantityExceedsStock);

        assert!(serde_json::from_str::<ErrorCode>("77").is_err());
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::CartEmpty.message(), "Cart is empty");
        assert_eq!(
            ErrorCode::AdminRequired.message(),
            "Forbidden: admin access required"
        );
    }
}
