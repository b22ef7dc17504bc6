//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册、登录、身份
//! - [`products`] - 商品目录 (写操作需 admin)
//! - [`cart`] - 购物车
//! - [`orders`] - 下单与订单查询
//! - [`reports`] - 销售汇总 (admin)
//!
//! 每个模块导出 `router(&ServerState)`，由 [`build_app`] 合并。
//! 需要登录的路由通过 `route_layer` 挂载 [`require_auth`]，
//! 管理员路由再叠加 [`require_admin`] (先认证后授权)。

pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;
pub mod reports;

use std::time::Duration;

use axum::{
    Router,
    extract::{FromRequest, FromRequestParts, Request, rejection::JsonRejection, rejection::QueryRejection},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;

use crate::auth::{require_admin, require_auth};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult, ErrorCode};

/// HTTP 请求日志中间件
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        target: "http_access",
        "{} {} {} {}ms",
        method,
        uri,
        response.status(),
        started.elapsed().as_millis()
    );

    response
}

/// 超时层返回的空 408 改写为统一信封
async fn timeout_envelope(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return AppError::new(ErrorCode::TimeoutError).into_response();
    }
    response
}

async fn fallback() -> AppError {
    AppError::not_found("Route")
}

/// Routes that need any authenticated identity
pub(crate) fn protected(router: Router<ServerState>, state: &ServerState) -> Router<ServerState> {
    router.route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

/// Routes that need the admin role; authentication runs first
pub(crate) fn admin_only(router: Router<ServerState>, state: &ServerState) -> Router<ServerState> {
    router
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

/// Build the complete application router with its middleware stack
pub fn build_app(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router(&state))
        .merge(products::router(&state))
        .merge(cart::router(&state))
        .merge(orders::router(&state))
        .merge(reports::router(&state))
        .fallback(fallback)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(middleware::from_fn(timeout_envelope))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(log_request))
}

/// JSON body extractor whose rejections use the API envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let message = match &rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        _ => rejection.body_text(),
    };
    AppError::invalid_request(message)
}

/// Query string extractor whose rejections use the API envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut http::request::Parts, state: &S) -> AppResult<Self> {
        match axum::extract::Query::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Query(value)) => Ok(AppQuery(value)),
            Err(rejection) => Err(query_rejection(rejection)),
        }
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    AppError::invalid_request(rejection.body_text())
}
