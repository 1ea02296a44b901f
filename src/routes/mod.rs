use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod doc;
pub mod health;
pub mod home;
pub mod menu;
pub mod orders;
pub mod params;
pub mod reservations;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/menu", menu::router())
        .nest("/cart", cart::router())
        .nest("/checkout", checkout::router())
        .nest("/orders", orders::router())
        .nest("/reservations", reservations::router())
}
