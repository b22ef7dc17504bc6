use super::CartError;
use crate::db::repository::cart::{self as cart_repo, CartLineRow};
use crate::db::repository::product as product_repo;
use crate::orders::money;
use shared::models::{Cart, CartLineView, CartView};
use sqlx::SqlitePool;

/// Resolve cart lines into the client view.
///
/// Lines whose product is gone keep their quantity but carry no product
/// and do not count towards the subtotal.
pub fn build_view(cart: &Cart, lines: Vec<CartLineRow>) -> CartView {
    let mut totals = Vec::with_capacity(lines.len());
    let items = lines
        .into_iter()
        .map(|line| {
            let product = line.product();
            let line_total = product.as_ref().map(|p| {
                let total = money::line_total(p.price, line.quantity);
                totals.push(total);
                money::to_f64(total)
            });
            CartLineView {
                product_id: line.product_id,
                quantity: line.quantity,
                product,
                line_total,
            }
        })
        .collect();

    CartView {
        id: Some(cart.id),
        user_id: cart.user_id,
        items,
        subtotal: money::to_f64(money::sum_lines(totals)),
    }
}

async fn load_view(pool: &SqlitePool, cart: &Cart) -> Result<CartView, CartError> {
    let lines = cart_repo::find_lines(pool, cart.id).await?;
    Ok(build_view(cart, lines))
}

/// The user's cart; users who never added anything get an empty view
pub async fn get_cart(pool: &SqlitePool, user_id: i64) -> Result<CartView, CartError> {
    match cart_repo::find_by_user(pool, user_id).await? {
        Some(cart) => load_view(pool, &cart).await,
        None => Ok(CartView::empty(user_id)),
    }
}

/// Add `quantity` units of a product, merging with an existing line.
///
/// Fails with [`CartError::ExceedsStock`] when the merged quantity would be
/// above the product's current stock; the cart is left unchanged then.
pub async fn add_item(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
    quantity: i64,
) -> Result<CartView, CartError> {
    if quantity < 1 {
        return Err(CartError::InvalidQuantity);
    }

    let product = product_repo::find_by_id(pool, product_id)
        .await?
        .ok_or(CartError::ProductNotFound(product_id))?;

    let existing = match cart_repo::find_by_user(pool, user_id).await? {
        Some(cart) => cart_repo::find_quantity(pool, cart.id, product_id)
            .await?
            .unwrap_or(0),
        None => 0,
    };
    if existing.saturating_add(quantity) > product.stock {
        return Err(CartError::ExceedsStock {
            product_id,
            available: product.stock,
        });
    }

    let cart = cart_repo::get_or_create(pool, user_id).await?;
    if !cart_repo::add_quantity(pool, cart.id, product_id, quantity).await? {
        // stock changed or product vanished between the check and the write
        let current = product_repo::find_by_id(pool, product_id)
            .await?
            .ok_or(CartError::ProductNotFound(product_id))?;
        return Err(CartError::ExceedsStock {
            product_id,
            available: current.stock,
        });
    }

    tracing::debug!(user_id, product_id, quantity, "Cart item added");
    load_view(pool, &cart).await
}

/// Remove a product's whole line from the user's cart
pub async fn remove_item(
    pool: &SqlitePool,
    user_id: i64,
    product_id: i64,
) -> Result<CartView, CartError> {
    let cart = cart_repo::find_by_user(pool, user_id)
        .await?
        .ok_or(CartError::CartNotFound)?;

    if !cart_repo::remove_line(pool, cart.id, product_id).await? {
        return Err(CartError::ItemNotFound(product_id));
    }

    tracing::debug!(user_id, product_id, "Cart item removed");
    load_view(pool, &cart).await
}
