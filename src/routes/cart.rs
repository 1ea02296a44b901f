use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::cart::{CartView, UpdateCartRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::CartItem,
    response::{ApiResponse, Meta},
    services::cart_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(view_cart))
        .route("/add/{item_id}", post(add_to_cart))
        .route("/remove/{cart_item_id}", post(remove_from_cart))
        .route("/update", post(update_quantity))
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart lines and subtotal for the current user", body = ApiResponse<CartView>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn view_cart(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let view = cart_service::view_cart(&state.pool, &user).await?;
    Ok(Json(ApiResponse::success("OK", view, Some(Meta::empty()))))
}

#[utoipa::path(
    post,
    path = "/api/cart/add/{item_id}",
    params(
        ("item_id" = Uuid, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Line created or quantity incremented", body = ApiResponse<CartItem>),
        (status = 404, description = "Item missing or unavailable"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CartItem>>> {
    let resp = cart_service::add_to_cart(&state.pool, &user, item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/remove/{cart_item_id}",
    params(
        ("cart_item_id" = Uuid, Path, description = "Cart line ID")
    ),
    responses(
        (status = 200, description = "Line removed", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "No such line for this user"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    Path(cart_item_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cart_service::remove_from_cart(&state.pool, &user, cart_item_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cart/update",
    request_body = UpdateCartRequest,
    responses(
        (status = 200, description = "Quantity overwritten; below 1 is a no-op", body = ApiResponse<CartView>),
        (status = 404, description = "No such line for this user"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UpdateCartRequest>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let resp = cart_service::update_quantity(&state.pool, &user, payload).await?;
    Ok(Json(resp))
}
