//! Order placement
//!
//! Checkout is one SQLite transaction whose first statement writes the
//! cart row. That takes the database write lock before anything is read,
//! so concurrent checkouts, cart edits and catalogue edits queue on the
//! busy timeout, and the lines, prices and stock read afterwards are the
//! values the order commits against.
//!
//! 1. **Validate**: every line must reference an existing product with
//!    enough stock. Totals are computed here.
//! 2. **Commit**: conditional stock decrement per line, order header and
//!    snapshot lines inserted, cart emptied.
//!
//! Any failure rolls the transaction back, leaving stock and cart as they
//! were.

use super::OrderError;
use super::money;
use crate::db::repository::cart::{self as cart_repo, CartLineRow};
use crate::db::repository::{order as order_repo, product as product_repo};
use shared::models::{Order, OrderItem};
use sqlx::SqlitePool;

/// Snapshot cart lines into order lines, checking them against the stock
/// read alongside them.
fn validate_lines(lines: &[CartLineRow]) -> Result<Vec<OrderItem>, OrderError> {
    if lines.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    lines
        .iter()
        .map(|line| {
            let product = line.product().ok_or(OrderError::ProductGone {
                product_id: line.product_id,
            })?;

            if line.quantity > product.stock {
                return Err(OrderError::InsufficientStock {
                    product_id: product.id,
                    name: product.name,
                });
            }

            Ok(OrderItem {
                product_id: product.id,
                line_total: money::to_f64(money::line_total(product.price, line.quantity)),
                name: product.name,
                price: product.price,
                quantity: line.quantity,
            })
        })
        .collect()
}

/// Place an order from the user's cart.
///
/// On success stock is reduced by every line's quantity, the returned order
/// is persisted and the cart is empty. On any error nothing has changed.
pub async fn place_order(pool: &SqlitePool, user_id: i64) -> Result<Order, OrderError> {
    let cart = cart_repo::find_by_user(pool, user_id)
        .await?
        .ok_or(OrderError::EmptyCart)?;
    let now = shared::util::now_millis();

    let mut tx = pool.begin().await?;
    // 先写后读: 持有写锁后再读取购物车与价格
    cart_repo::touch(&mut tx, cart.id, now).await?;

    let lines = cart_repo::find_lines(&mut *tx, cart.id).await?;
    let items = match validate_lines(&lines) {
        Ok(items) => items,
        Err(e) => {
            tx.rollback().await?;
            return Err(e);
        }
    };

    let total = money::sum_lines(items.iter().map(|i| money::to_decimal(i.line_total)));
    let order = Order {
        id: shared::util::snowflake_id(),
        user_id,
        total_amount: money::to_f64(total),
        created_at: now,
        items,
    };

    for item in &order.items {
        if !product_repo::decrement_stock(&mut tx, item.product_id, item.quantity, now).await? {
            tx.rollback().await?;
            tracing::warn!(
                user_id,
                product_id = item.product_id,
                quantity = item.quantity,
                "Stock decrement refused under write lock, rolled back"
            );
            return Err(OrderError::InsufficientStock {
                product_id: item.product_id,
                name: item.name.clone(),
            });
        }
    }

    order_repo::insert(&mut tx, &order).await?;
    cart_repo::clear(&mut tx, cart.id, now).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = order.id,
        user_id,
        lines = order.items.len(),
        total = order.total_amount,
        "Order placed"
    );
    Ok(order)
}

/// A single order, visible only to its owner
pub async fn get_order(pool: &SqlitePool, user_id: i64, order_id: i64) -> Result<Order, OrderError> {
    order_repo::find_by_id(pool, order_id)
        .await?
        .filter(|o| o.user_id == user_id)
        .ok_or(OrderError::NotFound(order_id))
}

/// The user's order history, newest first
pub async fn list_orders(pool: &SqlitePool, user_id: i64) -> Result<Vec<Order>, OrderError> {
    Ok(order_repo::find_by_user(pool, user_id).await?)
}
