use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::orders::{CheckoutPreview, OrderWithItems},
    error::{AppError, AppResult},
    forms::CheckoutForm,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(preview).post(submit))
}

#[utoipa::path(
    get,
    path = "/api/checkout",
    responses(
        (status = 200, description = "Cart summary and contact prefill", body = ApiResponse<CheckoutPreview>),
        (status = 400, description = "Cart is empty"),
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn preview(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<CheckoutPreview>>> {
    let resp = order_service::checkout_preview(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutForm,
    responses(
        (status = 200, description = "Order created from the cart", body = ApiResponse<OrderWithItems>),
        (status = 400, description = "Cart is empty or an item became unavailable"),
        (status = 422, description = "Contact form failed validation"),
    ),
    security(("bearer_auth" = [])),
    tag = "Checkout"
)]
pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(form): Json<CheckoutForm>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    // Validation happens before any database work; an invalid form never
    // touches the cart or the order tables.
    let contact = form.validate().map_err(AppError::Validation)?;
    let resp = order_service::checkout(&state, &user, contact).await?;
    Ok(Json(resp))
}
