//! Authentication Routes
//!
//! | 路径 | 方法 | 认证 |
//! |------|------|------|
//! | /auth/register | POST | 无 |
//! | /auth/login | POST | 无 |
//! | /me | GET | 登录用户 |

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let public = Router::new()
        .route("/auth/register", post(handler::register))
        .route("/auth/login", post(handler::login));

    let me = super::protected(Router::new().route("/me", get(handler::me)), state);

    public.merge(me)
}
