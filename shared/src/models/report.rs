//! Sales report

use serde::{Deserialize, Serialize};

/// Best-selling product line of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: i64,
    pub name: String,
    pub total_sold: i64,
}

/// Admin sales summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub top_products: Vec<TopProduct>,
}
