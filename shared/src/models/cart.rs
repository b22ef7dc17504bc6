//! Cart Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::product::Product;

/// Cart header, one per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Stored cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub added_at: i64,
}

/// Cart line with its product resolved
///
/// `product` is `None` when the product was deleted after the line was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: i64,
    pub quantity: i64,
    pub product: Option<Product>,
    pub line_total: Option<f64>,
}

/// Cart as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// `None` until the first item is added
    pub id: Option<i64>,
    pub user_id: i64,
    pub items: Vec<CartLineView>,
    pub subtotal: f64,
}

impl CartView {
    pub fn empty(user_id: i64) -> Self {
        Self {
            id: None,
            user_id,
            items: Vec::new(),
            subtotal: 0.0,
        }
    }
}

/// Add-to-cart payload
///
/// Fields stay loosely typed so the handler can report which one is wrong;
/// `productId` may arrive as a number or a numeric string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItem {
    pub product_id: Option<Value>,
    pub quantity: Option<Value>,
}
