//! Cart API 模块 - 所有路由需要登录

mod handler;

use axum::{Router, routing::delete, routing::get};

use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    super::protected(
        Router::new()
            .route("/cart", get(handler::get).post(handler::add))
            .route("/cart/{product_id}", delete(handler::remove)),
        state,
    )
}
