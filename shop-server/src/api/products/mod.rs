//! Product API 模块
//!
//! 读接口公开，写接口需要 admin。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/products", get(handler::list))
        .route("/products/{id}", get(handler::get_by_id));

    let write_routes = super::admin_only(
        Router::new()
            .route("/products", axum::routing::post(handler::create))
            .route(
                "/products/{id}",
                axum::routing::put(handler::update).delete(handler::delete),
            ),
        state,
    );

    read_routes.merge(write_routes)
}
