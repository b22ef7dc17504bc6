//! Report API Handlers

use axum::extract::State;

use crate::core::ServerState;
use crate::db::repository::report;
use crate::utils::{ApiResponse, AppResult};
use shared::models::ReportSummary;

/// GET /reports/summary - 订单数、营业额、畅销商品
pub async fn summary(State(state): State<ServerState>) -> AppResult<ApiResponse<ReportSummary>> {
    let summary = report::summary(state.pool()).await?;
    Ok(ApiResponse::success_with_message("Report fetched successfully", summary))
}
