use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use std::str::FromStr;
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutPreview, OrderList, OrderWithItems},
    entity::cart_items::{self, Column as CartCol, Entity as CartItems},
    entity::items::Column as ItemCol,
    entity::order_items::{
        ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
        Model as OrderItemModel,
    },
    entity::orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    error::{AppError, AppResult},
    forms::CheckoutContact,
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus, User},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::cart_service,
    state::AppState,
};

/// One cart line joined to its menu item, read under a row lock so a
/// double-submitted checkout serializes instead of producing two orders.
#[derive(Debug, FromQueryResult)]
struct CartSnapshotRow {
    item_id: Uuid,
    quantity: i32,
    price: Decimal,
    available: bool,
    item_name: String,
}

/// Everything the checkout page shows before submission. Fails on an empty
/// cart so the client can send the user back to the menu.
pub async fn checkout_preview(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CheckoutPreview>> {
    let cart = cart_service::view_cart(&state.pool, user).await?;
    if cart.lines.is_empty() {
        return Err(AppError::BadRequest("Your cart is empty".into()));
    }

    let account: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user.user_id)
        .fetch_optional(&state.pool)
        .await?;
    let account = match account {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };

    let preview = CheckoutPreview {
        cart,
        full_name: account.full_name(),
        email: account.email,
    };
    Ok(ApiResponse::success("OK", preview, Some(Meta::empty())))
}

/// Turn the cart into an order, atomically.
///
/// Inside one transaction: lock the caller's cart lines, snapshot each item's
/// current price into an order item, write the order with the summed total,
/// and clear the cart. Any failure rolls the whole thing back, leaving the
/// cart intact and no order behind.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    contact: CheckoutContact,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let txn = state.orm.begin().await?;

    let rows = CartItems::find()
        .select_only()
        .column(CartCol::ItemId)
        .column(CartCol::Quantity)
        .column_as(ItemCol::Price, "price")
        .column_as(ItemCol::Available, "available")
        .column_as(ItemCol::Name, "item_name")
        .join(JoinType::InnerJoin, cart_items::Relation::Items.def())
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_desc(CartCol::AddedAt)
        .lock(LockType::Update)
        .into_model::<CartSnapshotRow>()
        .all(&txn)
        .await?;

    if rows.is_empty() {
        return Err(AppError::BadRequest("Your cart is empty".into()));
    }

    // An item pulled from the menu after it was carted must not slip into an
    // order at a stale price.
    if let Some(gone) = rows.iter().find(|row| !row.available) {
        return Err(AppError::BadRequest(format!(
            "{} is no longer available; please remove it from your cart",
            gone.item_name
        )));
    }

    let subtotal: Decimal = rows
        .iter()
        .map(|row| row.price * Decimal::from(row.quantity))
        .sum();

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        status: Set(OrderStatus::Received.as_str().to_owned()),
        total_amount: Set(subtotal),
        customer_name: Set(contact.full_name),
        email: Set(contact.email),
        phone: Set(contact.phone),
        address: Set(contact.address),
        special_instructions: Set(contact.special_instructions),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(rows.len());
    for row in &rows {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            item_id: Set(row.item_id),
            quantity: Set(row.quantity),
            price_at_order: Set(row.price),
            special_requests: Set(String::new()),
        }
        .insert(&txn)
        .await?;
        items.push(order_item_from_model(item));
    }

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        user_id = %user.user_id,
        total = %order.total_amount,
        "order placed"
    );

    Ok(ApiResponse::success(
        "Order placed",
        OrderWithItems {
            order: order_from_model(order)?,
            items,
        },
        Some(Meta::empty()),
    ))
}

/// An order with its items, visible only to the user who placed it. A
/// mismatch is reported as NotFound, indistinguishable from a missing id.
pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_item_from_model)
        .collect();

    Ok(ApiResponse::success(
        "OK",
        OrderWithItems {
            order: order_from_model(order)?,
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        let status = OrderStatus::from_str(status).map_err(AppError::BadRequest)?;
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_model)
        .collect::<AppResult<Vec<Order>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "OK",
        OrderList { items: orders },
        Some(meta),
    ))
}

fn order_from_model(model: OrderModel) -> AppResult<Order> {
    let status = OrderStatus::from_str(&model.status)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        status,
        total_amount: model.total_amount,
        customer_name: model.customer_name,
        email: model.email,
        phone: model.phone,
        address: model.address,
        special_instructions: model.special_instructions,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

fn order_item_from_model(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        item_id: model.item_id,
        quantity: model.quantity,
        price_at_order: model.price_at_order,
        special_requests: model.special_requests,
    }
}
