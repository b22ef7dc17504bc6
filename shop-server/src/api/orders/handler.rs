//! Order API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::orders;
use crate::utils::validation::parse_id;
use crate::utils::{ApiResponse, AppResult};
use shared::models::Order;

#[derive(Debug, Serialize)]
pub struct OrderPayload {
    order: Order,
}

#[derive(Debug, Serialize)]
pub struct OrderListPayload {
    orders: Vec<Order>,
}

/// POST /orders - 用购物车下单
pub async fn place(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<(StatusCode, ApiResponse<OrderPayload>)> {
    let order = orders::place_order(state.pool(), user.id).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Order placed successfully", OrderPayload { order }),
    ))
}

/// GET /orders - 当前用户的订单，最新优先
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<ApiResponse<OrderListPayload>> {
    let orders = orders::list_orders(state.pool(), user.id).await?;
    Ok(ApiResponse::success_with_message(
        "Orders fetched successfully",
        OrderListPayload { orders },
    ))
}

/// GET /orders/:id - 单个订单 (仅本人)
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<OrderPayload>> {
    let id = parse_id(&id, "order")?;
    let order = orders::get_order(state.pool(), user.id, id).await?;
    Ok(ApiResponse::success_with_message(
        "Order fetched successfully",
        OrderPayload { order },
    ))
}
