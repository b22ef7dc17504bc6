//! Authentication Handlers
//!
//! Registration, login and identity check

use std::time::Duration;

use axum::{extract::State, http::StatusCode};

use crate::api::AppJson;
use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::ServerState;
use crate::db::repository::{RepoError, user};
use crate::security_log;
use crate::utils::validation::{validate_password, validate_username};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{AuthResponse, Credentials, Role, User, UserInfo};

/// Fixed delay on failed logins to blunt timing and guessing
const AUTH_FAILURE_DELAY_MS: u64 = 200;

fn issue_token(state: &ServerState, user: &User) -> AppResult<AuthResponse> {
    let info = UserInfo::from(user);
    let token = state
        .jwt_service()
        .generate_token(info.id, &info.username, info.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;
    Ok(AuthResponse { token, user: info })
}

/// POST /auth/register - 注册普通用户
pub async fn register(
    State(state): State<ServerState>,
    AppJson(req): AppJson<Credentials>,
) -> AppResult<(StatusCode, ApiResponse<AuthResponse>)> {
    let username = req.username.trim();
    validate_username(username)?;
    validate_password(&req.password)?;

    let hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let created = user::create(state.pool(), username, &hash, Role::User)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::UsernameExists),
            other => other.into(),
        })?;

    tracing::info!(user_id = created.id, username = %created.username, "User registered");

    let response = issue_token(&state, &created)?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("User registered successfully", response),
    ))
}

/// POST /auth/login - 登录
///
/// Unknown user and wrong password share one error so usernames cannot be probed.
pub async fn login(
    State(state): State<ServerState>,
    AppJson(req): AppJson<Credentials>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let username = req.username.trim();
    let found = user::find_by_username(state.pool(), username).await?;

    let account = match found {
        Some(u) if verify_password(&req.password, &u.password_hash) => u,
        other => {
            tokio::time::sleep(Duration::from_millis(AUTH_FAILURE_DELAY_MS)).await;
            security_log!(
                "WARN",
                "login_failed",
                username = username.to_string(),
                reason = if other.is_some() { "invalid_password" } else { "user_not_found" }
            );
            return Err(AppError::invalid_credentials());
        }
    };

    tracing::info!(
        user_id = account.id,
        username = %account.username,
        role = %account.role,
        "User logged in successfully"
    );

    let response = issue_token(&state, &account)?;
    Ok(ApiResponse::success_with_message("Login successful", response))
}

/// GET /me - 当前身份
pub async fn me(user: CurrentUser) -> ApiResponse<UserInfo> {
    ApiResponse::success_with_message(
        "Authorized",
        UserInfo {
            id: user.id,
            username: user.username,
            role: user.role,
        },
    )
}
