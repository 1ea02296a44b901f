use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::cart::CartView;
use crate::models::{Order, OrderItem};

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

/// What the checkout page needs before submission: the cart as it stands
/// and contact fields prefilled from the account.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutPreview {
    pub cart: CartView,
    pub full_name: String,
    pub email: String,
}
