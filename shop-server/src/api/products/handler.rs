//! Product API Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::api::{AppJson, AppQuery};
use crate::auth::CurrentUser;
use crate::db::repository::{RepoError, product};
use crate::core::ServerState;
use crate::orders::money::normalize_price;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, parse_id, validate_optional_text, validate_price,
    validate_required_text, validate_stock,
};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::models::{Product, ProductCreate, ProductQuery, ProductUpdate};
use shared::pagination::{Pagination, normalize_page};

#[derive(Debug, Serialize)]
pub struct ProductPayload {
    product: Product,
}

#[derive(Debug, Serialize)]
pub struct ProductListPayload {
    products: Vec<Product>,
    pagination: Pagination,
}

fn product_not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::ProductNotFound).with_detail("productId", id)
}

/// GET /products - 分页列表，按名称搜索，最新优先
pub async fn list(
    State(state): State<ServerState>,
    AppQuery(query): AppQuery<ProductQuery>,
) -> AppResult<ApiResponse<ProductListPayload>> {
    let (page, limit) = normalize_page(query.page, query.limit);
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let (products, total) = product::find_page(state.pool(), search, page, limit).await?;
    let page = shared::PaginatedResponse::new(products, total, page, limit);

    Ok(ApiResponse::success_with_message(
        "Products fetched successfully",
        ProductListPayload {
            products: page.items,
            pagination: page.pagination,
        },
    ))
}

/// GET /products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ProductPayload>> {
    let id = parse_id(&id, "product")?;
    let product = product::find_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| product_not_found(id))?;

    Ok(ApiResponse::success_with_message(
        "Product fetched successfully",
        ProductPayload { product },
    ))
}

/// POST /products - 创建商品 (admin)
pub async fn create(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    AppJson(mut payload): AppJson<ProductCreate>,
) -> AppResult<(StatusCode, ApiResponse<ProductPayload>)> {
    payload.name = payload.name.trim().to_string();
    payload.description = payload.description.trim().to_string();
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_price(payload.price)?;
    validate_stock(payload.stock)?;
    payload.price = normalize_price(payload.price);

    let product = product::create(state.pool(), payload).await?;

    tracing::info!(
        product_id = product.id,
        name = %product.name,
        operator_id = current_user.id,
        "Product created"
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::success_with_message("Product created successfully", ProductPayload { product }),
    ))
}

/// PUT /products/:id - 部分更新商品 (admin)
pub async fn update(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
    AppJson(mut payload): AppJson<ProductUpdate>,
) -> AppResult<ApiResponse<ProductPayload>> {
    let id = parse_id(&id, "product")?;

    payload.name = payload.name.map(|s| s.trim().to_string());
    payload.description = payload.description.map(|s| s.trim().to_string());
    validate_optional_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price)?;
        payload.price = Some(normalize_price(price));
    }
    if let Some(stock) = payload.stock {
        validate_stock(stock)?;
    }

    let product = product::update(state.pool(), id, payload)
        .await
        .map_err(|e| match e {
            RepoError::NotFound(_) => product_not_found(id),
            other => other.into(),
        })?;

    tracing::info!(product_id = id, operator_id = current_user.id, "Product updated");

    Ok(ApiResponse::success_with_message(
        "Product updated successfully",
        ProductPayload { product },
    ))
}

/// DELETE /products/:id - 删除商品 (admin)
///
/// Cart lines pointing at it stay and show up without a product.
pub async fn delete(
    State(state): State<ServerState>,
    current_user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = parse_id(&id, "product")?;
    if !product::delete(state.pool(), id).await? {
        return Err(product_not_found(id));
    }

    tracing::info!(product_id = id, operator_id = current_user.id, "Product deleted");
    Ok(ApiResponse::ok("Product deleted successfully"))
}
