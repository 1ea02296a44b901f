use axum::{Json, extract::State};
use axum_restaurant_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::cart::UpdateCartRequest,
    entity::{
        categories::ActiveModel as CategoryActive, items::ActiveModel as ItemActive,
        users::ActiveModel as UserActive,
    },
    error::AppError,
    forms::{CheckoutContact, CheckoutForm},
    middleware::auth::AuthUser,
    routes::checkout,
    routes::params::{OrderListQuery, Pagination},
    services::{cart_service, order_service},
    state::AppState,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

// Each test creates its own user and menu rows, so tests can run in parallel
// against one database without stepping on each other.
async fn setup() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url).await?;
    let orm = create_orm_conn(&database_url).await?;
    run_migrations(&orm).await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "test-secret".into(),
    };

    Ok(Some(AppState { pool, orm, config }))
}

async fn create_user(state: &AppState) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("diner-{}@example.com", Uuid::new_v4())),
        password_hash: Set("dummy".into()),
        first_name: Set("Test".into()),
        last_name: Set("Diner".into()),
        role: Set("user".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: "user".into(),
    })
}

async fn create_item(state: &AppState, price: Decimal, available: bool) -> anyhow::Result<Uuid> {
    let marker = Uuid::new_v4();
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(format!("Category {marker}")),
        slug: Set(format!("category-{marker}")),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        name: Set(format!("Dish {marker}")),
        description: Set("A dish for testing".into()),
        price: Set(price),
        image_url: Set(None),
        category_id: Set(category.id),
        available: Set(available),
        featured: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(item.id)
}

fn checkout_contact() -> CheckoutContact {
    CheckoutForm {
        full_name: "Test Diner".into(),
        email: "diner@example.com".into(),
        address: "1 Test Street".into(),
        phone: "+1 555 0100".into(),
        special_instructions: Some("no onions".into()),
    }
    .validate()
    .expect("fixture form should be valid")
}

#[tokio::test]
async fn double_add_yields_one_line_with_quantity_two() -> anyhow::Result<()> {
    let Some(state) = setup().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let item_id = create_item(&state, dec!(9.50), true).await?;

    cart_service::add_to_cart(&state.pool, &user, item_id).await?;
    cart_service::add_to_cart(&state.pool, &user, item_id).await?;

    let view = cart_service::view_cart(&state.pool, &user).await?;
    assert_eq!(view.lines.len(), 1, "expected a single cart line");
    assert_eq!(view.lines[0].quantity, 2);
    assert_eq!(view.lines[0].line_total, dec!(19.00));
    assert_eq!(view.subtotal, dec!(19.00));

    Ok(())
}

#[tokio::test]
async fn line_total_follows_current_price() -> anyhow::Result<()> {
    let Some(state) = setup().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let item_id = create_item(&state, dec!(10.00), true).await?;

    cart_service::add_to_cart(&state.pool, &user, item_id).await?;

    sqlx::query("UPDATE items SET price = $2 WHERE id = $1")
        .bind(item_id)
        .bind(dec!(12.00))
        .execute(&state.pool)
        .await?;

    // Pre-checkout, the cart always reflects the live menu price.
    let view = cart_service::view_cart(&state.pool, &user).await?;
    assert_eq!(view.lines[0].line_total, dec!(12.00));

    Ok(())
}

#[tokio::test]
async fn checkout_snapshots_cart_and_clears_it() -> anyhow::Result<()> {
    let Some(state) = setup().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let pasta = create_item(&state, dec!(11.50), true).await?;
    let wine = create_item(&state, dec!(6.25), true).await?;

    cart_service::add_to_cart(&state.pool, &user, pasta).await?;
    cart_service::add_to_cart(&state.pool, &user, pasta).await?;
    cart_service::add_to_cart(&state.pool, &user, wine).await?;

    let resp = order_service::checkout(&state, &user, checkout_contact()).await?;
    let placed = resp.data.expect("checkout payload");

    assert_eq!(placed.order.total_amount, dec!(29.25));
    assert_eq!(placed.items.len(), 2, "one order item per distinct cart line");
    assert_eq!(placed.order.customer_name, "Test Diner");

    let items_sum: Decimal = placed.items.iter().map(|i| i.line_total()).sum();
    assert_eq!(items_sum, placed.order.total_amount);

    let view = cart_service::view_cart(&state.pool, &user).await?;
    assert!(view.lines.is_empty(), "cart must be empty after checkout");

    // A later price change must not leak into the recorded order.
    sqlx::query("UPDATE items SET price = $2 WHERE id = $1")
        .bind(pasta)
        .bind(dec!(99.99))
        .execute(&state.pool)
        .await?;

    let fetched = order_service::get_order(&state, &user, placed.order.id)
        .await?
        .data
        .expect("order payload");
    assert_eq!(fetched.order.total_amount, dec!(29.25));
    let frozen_sum: Decimal = fetched.items.iter().map(|i| i.line_total()).sum();
    assert_eq!(frozen_sum, dec!(29.25));

    Ok(())
}

#[tokio::test]
async fn empty_cart_checkout_creates_no_order() -> anyhow::Result<()> {
    let Some(state) = setup().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;

    let err = order_service::checkout(&state, &user, checkout_contact())
        .await
        .expect_err("empty cart must not check out");
    assert!(matches!(err, AppError::BadRequest(_)));

    let orders = order_service::list_orders(
        &state,
        &user,
        OrderListQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            status: None,
        },
    )
    .await?
    .data
    .expect("order list");
    assert!(orders.items.is_empty());

    Ok(())
}

#[tokio::test]
async fn invalid_form_checkout_creates_no_order_and_keeps_cart() -> anyhow::Result<()> {
    let Some(state) = setup().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let item_id = create_item(&state, dec!(7.00), true).await?;
    cart_service::add_to_cart(&state.pool, &user, item_id).await?;

    // Through the handler, so the form is rejected before the orchestrator
    // ever runs.
    let form = CheckoutForm {
        full_name: "Test Diner".into(),
        email: "".into(),
        address: "1 Test Street".into(),
        phone: "+1 555 0100".into(),
        special_instructions: None,
    };
    let err = checkout::submit(State(state.clone()), user.clone(), Json(form))
        .await
        .expect_err("invalid form must not check out");
    assert!(matches!(err, AppError::Validation(_)));

    let orders = order_service::list_orders(
        &state,
        &user,
        OrderListQuery {
            pagination: Pagination {
                page: None,
                per_page: None,
            },
            status: None,
        },
    )
    .await?
    .data
    .expect("order list");
    assert!(orders.items.is_empty(), "no order may exist");

    let view = cart_service::view_cart(&state.pool, &user).await?;
    assert_eq!(view.lines.len(), 1, "cart must be untouched");
    assert_eq!(view.lines[0].quantity, 1);

    Ok(())
}

#[tokio::test]
async fn unavailable_item_blocks_add_and_checkout() -> anyhow::Result<()> {
    let Some(state) = setup().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;

    let retired = create_item(&state, dec!(5.00), false).await?;
    let err = cart_service::add_to_cart(&state.pool, &user, retired)
        .await
        .expect_err("unavailable item must not be addable");
    assert!(matches!(err, AppError::NotFound));

    // Carted while available, pulled from the menu before checkout.
    let item_id = create_item(&state, dec!(5.00), true).await?;
    cart_service::add_to_cart(&state.pool, &user, item_id).await?;
    sqlx::query("UPDATE items SET available = FALSE WHERE id = $1")
        .bind(item_id)
        .execute(&state.pool)
        .await?;

    let err = order_service::checkout(&state, &user, checkout_contact())
        .await
        .expect_err("checkout must reject an unavailable item");
    assert!(matches!(err, AppError::BadRequest(_)));

    // The failed checkout left the cart alone.
    let view = cart_service::view_cart(&state.pool, &user).await?;
    assert_eq!(view.lines.len(), 1);

    Ok(())
}

#[tokio::test]
async fn update_quantity_overwrites_and_ignores_below_one() -> anyhow::Result<()> {
    let Some(state) = setup().await? else {
        return Ok(());
    };
    let user = create_user(&state).await?;
    let item_id = create_item(&state, dec!(4.00), true).await?;

    cart_service::add_to_cart(&state.pool, &user, item_id).await?;
    let line_id = cart_service::view_cart(&state.pool, &user).await?.lines[0].id;

    let view = cart_service::update_quantity(
        &state.pool,
        &user,
        UpdateCartRequest {
            cart_item_id: line_id,
            quantity: 5,
        },
    )
    .await?
    .data
    .expect("cart view");
    assert_eq!(view.lines[0].quantity, 5);
    assert_eq!(view.subtotal, dec!(20.00));

    let view = cart_service::update_quantity(
        &state.pool,
        &user,
        UpdateCartRequest {
            cart_item_id: line_id,
            quantity: 0,
        },
    )
    .await?
    .data
    .expect("cart view");
    assert_eq!(view.lines[0].quantity, 5, "below-1 update is a no-op");

    let err = cart_service::update_quantity(
        &state.pool,
        &user,
        UpdateCartRequest {
            cart_item_id: Uuid::new_v4(),
            quantity: 2,
        },
    )
    .await
    .expect_err("unknown line must be NotFound");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

#[tokio::test]
async fn users_cannot_touch_each_others_rows() -> anyhow::Result<()> {
    let Some(state) = setup().await? else {
        return Ok(());
    };
    let alice = create_user(&state).await?;
    let mallory = create_user(&state).await?;
    let item_id = create_item(&state, dec!(8.00), true).await?;

    cart_service::add_to_cart(&state.pool, &alice, item_id).await?;
    let line_id = cart_service::view_cart(&state.pool, &alice).await?.lines[0].id;

    let err = cart_service::remove_from_cart(&state.pool, &mallory, line_id)
        .await
        .expect_err("foreign cart line must be invisible");
    assert!(matches!(err, AppError::NotFound));

    let err = cart_service::update_quantity(
        &state.pool,
        &mallory,
        UpdateCartRequest {
            cart_item_id: line_id,
            quantity: 3,
        },
    )
    .await
    .expect_err("foreign cart line must be invisible");
    assert!(matches!(err, AppError::NotFound));

    let placed = order_service::checkout(&state, &alice, checkout_contact())
        .await?
        .data
        .expect("checkout payload");

    let err = order_service::get_order(&state, &mallory, placed.order.id)
        .await
        .expect_err("foreign order must be invisible");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}
