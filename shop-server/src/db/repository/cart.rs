//! Cart Repository

use super::{RepoError, RepoResult};
use shared::models::{Cart, Product};
use sqlx::{SqliteConnection, SqlitePool};

const CART_SELECT: &str = "SELECT id, user_id, created_at, updated_at FROM cart";

/// Cart line joined against the live product row.
///
/// Product columns are `NULL` when the product has been deleted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CartLineRow {
    pub product_id: i64,
    pub quantity: i64,
    pub added_at: i64,
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub description: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl CartLineRow {
    /// The resolved product, if it still exists
    pub fn product(&self) -> Option<Product> {
        Some(Product {
            id: self.product_id,
            name: self.name.clone()?,
            price: self.price?,
            stock: self.stock?,
            description: self.description.clone()?,
            created_at: self.created_at?,
            updated_at: self.updated_at?,
        })
    }
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Option<Cart>> {
    let sql = format!("{CART_SELECT} WHERE user_id = ?");
    let row = sqlx::query_as::<_, Cart>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Load the user's cart, creating an empty one on first use
pub async fn get_or_create(pool: &SqlitePool, user_id: i64) -> RepoResult<Cart> {
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO cart (id, user_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?3) ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(shared::util::snowflake_id())
    .bind(user_id)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_user(pool, user_id)
        .await?
        .ok_or_else(|| RepoError::Database(format!("Failed to create cart for user {user_id}")))
}

/// Lines of a cart in insertion order, products resolved.
///
/// Takes the pool or a transaction's connection.
pub async fn find_lines(
    conn: impl sqlx::Executor<'_, Database = sqlx::Sqlite>,
    cart_id: i64,
) -> RepoResult<Vec<CartLineRow>> {
    let rows = sqlx::query_as::<_, CartLineRow>(
        "SELECT ci.product_id, ci.quantity, ci.added_at, p.name, p.price, p.stock, p.description, p.created_at, p.updated_at \
         FROM cart_item ci LEFT JOIN product p ON p.id = ci.product_id \
         WHERE ci.cart_id = ? ORDER BY ci.added_at, ci.product_id",
    )
    .bind(cart_id)
    .fetch_all(conn)
    .await?;
    Ok(rows)
}

/// Current quantity of a product in a cart, `None` when there is no line
pub async fn find_quantity(
    pool: &SqlitePool,
    cart_id: i64,
    product_id: i64,
) -> RepoResult<Option<i64>> {
    let quantity = sqlx::query_scalar("SELECT quantity FROM cart_item WHERE cart_id = ? AND product_id = ?")
        .bind(cart_id)
        .bind(product_id)
        .fetch_optional(pool)
        .await?;
    Ok(quantity)
}

/// Add `quantity` units of a product, merging into an existing line.
///
/// The merge only happens while the merged quantity stays within the
/// product's current stock; returns `false` when that bound refused it.
pub async fn add_quantity(
    pool: &SqlitePool,
    cart_id: i64,
    product_id: i64,
    quantity: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query(
        "INSERT INTO cart_item (cart_id, product_id, quantity, added_at) \
         SELECT ?1, ?2, ?3, ?4 WHERE ?3 <= (SELECT stock FROM product WHERE id = ?2) \
         ON CONFLICT (cart_id, product_id) DO UPDATE SET quantity = cart_item.quantity + excluded.quantity \
         WHERE cart_item.quantity + excluded.quantity <= (SELECT stock FROM product WHERE id = ?2)",
    )
    .bind(cart_id)
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    if rows.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    touch(&mut tx, cart_id, now).await?;
    tx.commit().await?;
    Ok(true)
}

/// Remove a product's line; `false` when there was none
pub async fn remove_line(pool: &SqlitePool, cart_id: i64, product_id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;

    let rows = sqlx::query("DELETE FROM cart_item WHERE cart_id = ? AND product_id = ?")
        .bind(cart_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;

    if rows.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    touch(&mut tx, cart_id, now).await?;
    tx.commit().await?;
    Ok(true)
}

/// Empty a cart, keeping the cart row
pub async fn clear(conn: &mut SqliteConnection, cart_id: i64, now: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM cart_item WHERE cart_id = ?")
        .bind(cart_id)
        .execute(&mut *conn)
        .await?;
    touch(conn, cart_id, now).await?;
    Ok(rows.rows_affected())
}

/// Bump the cart's `updated_at`
pub async fn touch(conn: &mut SqliteConnection, cart_id: i64, now: i64) -> RepoResult<()> {
    sqlx::query("UPDATE cart SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(cart_id)
        .execute(conn)
        .await?;
    Ok(())
}
