//! Report API 模块 - admin only

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    super::admin_only(
        Router::new().route("/reports/summary", get(handler::summary)),
        state,
    )
}
