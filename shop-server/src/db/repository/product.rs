//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate};
use sqlx::{SqliteConnection, SqlitePool};

const PRODUCT_SELECT: &str =
    "SELECT id, name, price, stock, description, created_at, updated_at FROM product";

/// Unicode lowercase form stored in `search_name`.
///
/// SQLite's `LIKE` and `lower()` only fold ASCII, so folding happens here.
fn search_key(name: &str) -> String {
    name.to_lowercase()
}

/// Escape `%`, `_` and `\` so user input matches literally inside LIKE
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// One page of products, newest first, plus the total match count.
///
/// `search` is a case-insensitive substring match on the name.
pub async fn find_page(
    pool: &SqlitePool,
    search: Option<&str>,
    page: u32,
    limit: u32,
) -> RepoResult<(Vec<Product>, u64)> {
    let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);
    let pattern = search.map(|s| like_pattern(&search_key(s)));

    let (rows, total) = match &pattern {
        Some(pattern) => {
            let sql = format!(
                "{PRODUCT_SELECT} WHERE search_name LIKE ?1 ESCAPE '\\' ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3"
            );
            let rows = sqlx::query_as::<_, Product>(&sql)
                .bind(pattern)
                .bind(i64::from(limit))
                .bind(offset)
                .fetch_all(pool)
                .await?;
            let total: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE search_name LIKE ?1 ESCAPE '\\'")
                    .bind(pattern)
                    .fetch_one(pool)
                    .await?;
            (rows, total)
        }
        None => {
            let sql =
                format!("{PRODUCT_SELECT} ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2");
            let rows = sqlx::query_as::<_, Product>(&sql)
                .bind(i64::from(limit))
                .bind(offset)
                .fetch_all(pool)
                .await?;
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
                .fetch_one(pool)
                .await?;
            (rows, total)
        }
    };

    Ok((rows, total.max(0) as u64))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Insert a product. Input is expected to be validated and normalized.
pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO product (id, name, search_name, price, stock, description, created_at, updated_at) VALUES (?1, ?2, ?7, ?3, ?4, ?5, ?6, ?6)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.price)
    .bind(data.stock)
    .bind(&data.description)
    .bind(now)
    .bind(search_key(&data.name))
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

/// Partial update: `None` fields keep their stored value
pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let search_name = data.name.as_deref().map(search_key);
    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), search_name = COALESCE(?7, search_name), price = COALESCE(?2, price), stock = COALESCE(?3, stock), description = COALESCE(?4, description), updated_at = ?5 WHERE id = ?6",
    )
    .bind(data.name)
    .bind(data.price)
    .bind(data.stock)
    .bind(data.description)
    .bind(now)
    .bind(id)
    .bind(search_name)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Hard delete. Cart lines and order snapshots referencing it are kept.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Atomically take `quantity` units out of stock.
///
/// Returns `false` (and changes nothing) when the product is missing or
/// holds fewer than `quantity` units.
pub async fn decrement_stock(
    conn: &mut SqliteConnection,
    id: i64,
    quantity: i64,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE product SET stock = stock - ?1, updated_at = ?3 WHERE id = ?2 AND stock >= ?1",
    )
    .bind(quantity)
    .bind(id)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(rows.rows_affected() == 1)
}
