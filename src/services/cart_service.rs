use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::cart::{CartLine, CartView, UpdateCartRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartItem, MenuItem},
    response::{ApiResponse, Meta},
};

#[derive(FromRow)]
struct CartWithItemRow {
    cart_id: Uuid,
    quantity: i32,
    item_id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    image_url: Option<String>,
    category_id: Uuid,
    available: bool,
    featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CartWithItemRow {
    fn into_line(self) -> CartLine {
        let line_total = self.price * Decimal::from(self.quantity);
        CartLine {
            id: self.cart_id,
            item: MenuItem {
                id: self.item_id,
                name: self.name,
                description: self.description,
                price: self.price,
                image_url: self.image_url,
                category_id: self.category_id,
                available: self.available,
                featured: self.featured,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            quantity: self.quantity,
            line_total,
        }
    }
}

/// The caller's cart, most recent line first, with line totals and subtotal
/// recomputed from the current item prices.
pub async fn view_cart(pool: &DbPool, user: &AuthUser) -> AppResult<CartView> {
    let rows = sqlx::query_as::<_, CartWithItemRow>(
        r#"
        SELECT ci.id AS cart_id, ci.quantity,
               i.id AS item_id, i.name, i.description, i.price, i.image_url,
               i.category_id, i.available, i.featured, i.created_at, i.updated_at
        FROM cart_items ci
        JOIN items i ON i.id = ci.item_id
        WHERE ci.user_id = $1
        ORDER BY ci.added_at DESC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(pool)
    .await?;

    let lines: Vec<CartLine> = rows.into_iter().map(CartWithItemRow::into_line).collect();
    let subtotal: Decimal = lines.iter().map(|line| line.line_total).sum();

    Ok(CartView { lines, subtotal })
}

/// First add inserts a line with quantity 1; adding the same item again bumps
/// the existing line. The (user_id, item_id) unique index does the heavy
/// lifting, so concurrent adds cannot produce duplicate rows.
pub async fn add_to_cart(
    pool: &DbPool,
    user: &AuthUser,
    item_id: Uuid,
) -> AppResult<ApiResponse<CartItem>> {
    let item: Option<MenuItem> =
        sqlx::query_as("SELECT * FROM items WHERE id = $1 AND available")
            .bind(item_id)
            .fetch_optional(pool)
            .await?;
    let item = match item {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };

    let cart_item: CartItem = sqlx::query_as(
        r#"
        INSERT INTO cart_items (id, user_id, item_id, quantity)
        VALUES ($1, $2, $3, 1)
        ON CONFLICT (user_id, item_id)
        DO UPDATE SET quantity = cart_items.quantity + 1, updated_at = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user.user_id)
    .bind(item_id)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(
        format!("{} added to cart", item.name),
        cart_item,
        None,
    ))
}

pub async fn remove_from_cart(
    pool: &DbPool,
    user: &AuthUser,
    cart_item_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
        .bind(cart_item_id)
        .bind(user.user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Item removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Overwrite a line's quantity. A quantity below 1 is a no-op, mirroring a
/// form that simply refuses to go lower; removal is its own endpoint.
pub async fn update_quantity(
    pool: &DbPool,
    user: &AuthUser,
    payload: UpdateCartRequest,
) -> AppResult<ApiResponse<CartView>> {
    if payload.quantity < 1 {
        let view = view_cart(pool, user).await?;
        return Ok(ApiResponse::success("Cart unchanged", view, None));
    }

    let updated: Option<CartItem> = sqlx::query_as(
        r#"
        UPDATE cart_items
        SET quantity = $3, updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING *
        "#,
    )
    .bind(payload.cart_item_id)
    .bind(user.user_id)
    .bind(payload.quantity)
    .fetch_optional(pool)
    .await?;

    if updated.is_none() {
        return Err(AppError::NotFound);
    }

    let view = view_cart(pool, user).await?;
    Ok(ApiResponse::success("Cart updated", view, None))
}
