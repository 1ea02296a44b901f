use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::MenuItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCartRequest {
    pub cart_item_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub item: MenuItem,
    pub quantity: i32,
    /// Recomputed as price * quantity on every read, never stored.
    pub line_total: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub subtotal: Decimal,
}
