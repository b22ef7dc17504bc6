//! Report Repository
//!
//! Read-only aggregates over committed orders.

use super::RepoResult;
use shared::models::{ReportSummary, TopProduct};
use sqlx::SqlitePool;

/// Number of best sellers in the summary
pub const TOP_PRODUCTS_LIMIT: i64 = 3;

/// Order count, revenue and best sellers.
///
/// Best sellers are ranked by units sold, ties broken by product id
/// ascending. The name shown is the snapshot name of the product's
/// first order line.
pub async fn summary(pool: &SqlitePool) -> RepoResult<ReportSummary> {
    let (total_orders, total_revenue): (i64, f64) = sqlx::query_as(
        "SELECT COUNT(*), COALESCE(SUM(total_amount), 0.0) FROM shop_order",
    )
    .fetch_one(pool)
    .await?;

    let top_products = sqlx::query_as::<_, TopProduct>(
        "SELECT oi.product_id AS product_id, \
                (SELECT name FROM order_item f WHERE f.product_id = oi.product_id ORDER BY f.rowid LIMIT 1) AS name, \
                SUM(oi.quantity) AS total_sold \
         FROM order_item oi \
         GROUP BY oi.product_id \
         ORDER BY total_sold DESC, oi.product_id ASC \
         LIMIT ?",
    )
    .bind(TOP_PRODUCTS_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(ReportSummary {
        total_orders,
        total_revenue: crate::orders::money::normalize_price(total_revenue),
        top_products,
    })
}
