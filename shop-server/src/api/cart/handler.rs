//! Cart API Handlers

use axum::extract::{Path, State};
use serde::Serialize;
use serde_json::Value;

use crate::api::AppJson;
use crate::auth::CurrentUser;
use crate::cart;
use crate::core::ServerState;
use crate::utils::validation::parse_id;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{AddCartItem, CartView};

#[derive(Debug, Serialize)]
pub struct CartPayload {
    cart: CartView,
}

/// Product id as a positive integer or a numeric string
fn product_id_of(value: &Value) -> AppResult<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::invalid_request("Invalid product ID")),
        Value::String(s) => parse_id(s, "product"),
        _ => Err(AppError::invalid_request("Invalid product ID")),
    }
}

/// Quantity as a positive whole number (`2.0` counts as whole)
fn quantity_of(value: &Value) -> AppResult<i64> {
    let quantity = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 1.0 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        _ => None,
    };
    quantity
        .filter(|q| *q >= 1)
        .ok_or_else(|| AppError::validation("Quantity must be a positive integer"))
}

fn parse_add_item(payload: &AddCartItem) -> AppResult<(i64, i64)> {
    let (product_id, quantity) = match (&payload.product_id, &payload.quantity) {
        (Some(p), Some(q)) if !p.is_null() && !q.is_null() => (p, q),
        _ => {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "productId and quantity are required",
            ));
        }
    };
    Ok((product_id_of(product_id)?, quantity_of(quantity)?))
}

/// POST /cart - 加入购物车 (同一商品合并数量)
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    AppJson(payload): AppJson<AddCartItem>,
) -> AppResult<ApiResponse<CartPayload>> {
    let (product_id, quantity) = parse_add_item(&payload)?;
    let cart = cart::add_item(state.pool(), user.id, product_id, quantity).await?;
    Ok(ApiResponse::success_with_message("Item added to cart", CartPayload { cart }))
}

/// GET /cart - 当前购物车 (无购物车时返回空)
pub async fn get(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<CartPayload>> {
    let cart = cart::get_cart(state.pool(), user.id).await?;
    Ok(ApiResponse::success_with_message("Cart fetched successfully", CartPayload { cart }))
}

/// DELETE /cart/:productId - 删除整行
pub async fn remove(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<String>,
) -> AppResult<ApiResponse<CartPayload>> {
    let product_id = parse_id(&product_id, "product")?;
    let cart = cart::remove_item(state.pool(), user.id, product_id).await?;
    Ok(ApiResponse::success_with_message("Item removed from cart", CartPayload { cart }))
}
