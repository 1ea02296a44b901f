use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        cart::{CartLine, CartView, UpdateCartRequest},
        menu::{HomeResponse, MenuResponse},
        orders::{CheckoutPreview, OrderList, OrderWithItems},
    },
    forms::{CheckoutForm, FieldError, ReservationForm},
    models::{CartItem, Category, MenuItem, Order, OrderItem, OrderStatus, Reservation, User},
    response::{ApiResponse, Meta},
    routes::{auth, cart, checkout, health, home, menu, orders, params, reservations},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        home::index,
        menu::list_menu,
        auth::register,
        auth::login,
        cart::view_cart,
        cart::add_to_cart,
        cart::remove_from_cart,
        cart::update_quantity,
        checkout::preview,
        checkout::submit,
        orders::list_orders,
        orders::get_order,
        reservations::create_reservation
    ),
    components(
        schemas(
            User,
            Category,
            MenuItem,
            CartItem,
            Order,
            OrderItem,
            OrderStatus,
            Reservation,
            CartLine,
            CartView,
            UpdateCartRequest,
            MenuResponse,
            HomeResponse,
            CheckoutForm,
            CheckoutPreview,
            ReservationForm,
            FieldError,
            OrderList,
            OrderWithItems,
            params::Pagination,
            params::MenuQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<MenuResponse>,
            ApiResponse<CartView>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<Reservation>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Menu", description = "Menu browsing endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Checkout", description = "Checkout endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Reservations", description = "Table reservation endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
