//! 分页响应

use serde::{Deserialize, Serialize};

/// Default page size
pub const DEFAULT_LIMIT: u32 = 10;
/// Upper bound on the page size a client may request
pub const MAX_LIMIT: u32 = 100;

/// 分页信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 当前页码 (从 1 开始)
    pub page: u32,
    /// 每页数量
    pub limit: u32,
    /// 总记录数
    pub total_items: u64,
    /// 总页数
    pub total_pages: u32,
}

/// 分页响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total_items: u64, page: u32, limit: u32) -> Self {
        let total_pages = if limit > 0 {
            total_items.div_ceil(limit as u64) as u32
        } else {
            0
        };

        Self {
            items,
            pagination: Pagination {
                page,
                limit,
                total_items,
                total_pages,
            },
        }
    }
}

/// Clamp raw `page`/`limit` query values.
///
/// Missing or zero values fall back to page 1 and [`DEFAULT_LIMIT`];
/// `limit` is capped at [`MAX_LIMIT`].
pub fn normalize_page(page: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    let page = page.filter(|p| *p > 0).unwrap_or(1);
    let limit = limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_LIMIT)
        .min(MAX_LIMIT);
    (page, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let page = PaginatedResponse::new(vec![1, 2, 3], 21, 1, 10);
        assert_eq!(page.pagination.total_pages, 3);

        let empty: PaginatedResponse<i32> = PaginatedResponse::new(vec![], 0, 1, 10);
        assert_eq!(empty.pagination.total_pages, 0);
    }

    #[test]
    fn test_normalize_page() {
        assert_eq!(normalize_page(None, None), (1, 10));
        assert_eq!(normalize_page(Some(0), Some(0)), (1, 10));
        assert_eq!(normalize_page(Some(3), Some(500)), (3, 100));
        assert_eq!(normalize_page(Some(2), Some(25)), (2, 25));
    }

    #[test]
    fn test_serialize_camel_case() {
        let page = PaginatedResponse::new(vec!["a"], 1, 1, 10);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pagination"]["totalItems"], 1);
        assert_eq!(json["pagination"]["totalPages"], 1);
        assert_eq!(json["items"][0], "a");
    }
}
