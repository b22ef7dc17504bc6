//! Order Repository
//!
//! Orders are append-only: there is an insert path and read paths, nothing else.

use super::RepoResult;
use shared::models::{Order, OrderItem};
use sqlx::{SqliteConnection, SqlitePool};

const ORDER_SELECT: &str = "SELECT id, user_id, total_amount, created_at FROM shop_order";
const ITEM_SELECT: &str =
    "SELECT product_id, name, price, quantity, line_total FROM order_item WHERE order_id = ? ORDER BY rowid";

/// Insert an order header and its lines on the caller's connection
/// (normally the checkout transaction).
pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO shop_order (id, user_id, total_amount, created_at) VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(order.total_amount)
    .bind(order.created_at)
    .execute(&mut *conn)
    .await?;

    for item in &order.items {
        sqlx::query(
            "INSERT INTO order_item (order_id, product_id, name, price, quantity, line_total) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(order.id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .bind(item.line_total)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

async fn load_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(ITEM_SELECT)
        .bind(order_id)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let Some(mut order) = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };
    order.items = load_items(pool, order.id).await?;
    Ok(Some(order))
}

/// A user's orders, newest first, lines included
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE user_id = ? ORDER BY created_at DESC, id DESC");
    let mut orders = sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    for order in &mut orders {
        order.items = load_items(pool, order.id).await?;
    }
    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::temp_db;

    fn sample(id: i64, user_id: i64, created_at: i64) -> Order {
        Order {
            id,
            user_id,
            total_amount: 25.0,
            created_at,
            items: vec![
                OrderItem {
                    product_id: 10,
                    name: "Pen".into(),
                    price: 2.5,
                    quantity: 4,
                    line_total: 10.0,
                },
                OrderItem {
                    product_id: 11,
                    name: "Notebook".into(),
                    price: 7.5,
                    quantity: 2,
                    line_total: 15.0,
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let (_dir, db) = temp_db().await;
        let order = sample(1, 9, 100);

        let mut conn = db.pool.acquire().await.unwrap();
        insert(&mut conn, &order).await.unwrap();
        drop(conn);

        let loaded = find_by_id(&db.pool, 1).await.unwrap().unwrap();
        assert_eq!(loaded, order);
        assert!(find_by_id(&db.pool, 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_user_newest_first() {
        let (_dir, db) = temp_db().await;
        let mut conn = db.pool.acquire().await.unwrap();
        insert(&mut conn, &sample(1, 9, 100)).await.unwrap();
        insert(&mut conn, &sample(2, 9, 200)).await.unwrap();
        insert(&mut conn, &sample(3, 8, 300)).await.unwrap();
        drop(conn);

        let orders = find_by_user(&db.pool, 9).await.unwrap();
        let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(orders[0].items.len(), 2);
    }
}
