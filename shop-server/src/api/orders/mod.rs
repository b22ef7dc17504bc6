//! Order API 模块 - 所有路由需要登录

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    super::protected(
        Router::new()
            .route("/orders", get(handler::list).post(handler::place))
            .route("/orders/{id}", get(handler::get_by_id)),
        state,
    )
}
