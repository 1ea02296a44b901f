use axum_restaurant_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    entity::{categories::ActiveModel as CategoryActive, items::ActiveModel as ItemActive},
    error::AppError,
    forms::ReservationForm,
    middleware::auth::AuthUser,
    services::{cart_service, menu_service, order_service, reservation_service},
    state::AppState,
};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

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

async fn create_category(state: &AppState, slug: &str) -> anyhow::Result<Uuid> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(format!("Category {slug}")),
        slug: Set(slug.to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(category.id)
}

async fn create_item(
    state: &AppState,
    category_id: Uuid,
    name: &str,
    available: bool,
) -> anyhow::Result<Uuid> {
    let item = ItemActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set("A dish for testing".into()),
        price: Set(dec!(10.00)),
        image_url: Set(None),
        category_id: Set(category_id),
        available: Set(available),
        featured: Set(false),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(item.id)
}

#[tokio::test]
async fn menu_filters_by_category_and_hides_unavailable() -> anyhow::Result<()> {
    let Some(state) = setup().await? else {
        return Ok(());
    };
    let slug_a = format!("mains-{}", Uuid::new_v4());
    let slug_b = format!("drinks-{}", Uuid::new_v4());
    let cat_a = create_category(&state, &slug_a).await?;
    let cat_b = create_category(&state, &slug_b).await?;

    let listed = create_item(&state, cat_a, "Listed dish", true).await?;
    let hidden = create_item(&state, cat_a, "Hidden dish", false).await?;
    let other = create_item(&state, cat_b, "Other dish", true).await?;

    let menu = menu_service::list_menu(&state.pool, Some(&slug_a)).await?;
    let ids: Vec<Uuid> = menu.items.iter().map(|i| i.id).collect();
    assert!(ids.contains(&listed));
    assert!(!ids.contains(&hidden), "unavailable items stay off the menu");
    assert!(!ids.contains(&other), "category filter must apply");

    // Unknown slug is an empty menu, not an error.
    let menu = menu_service::list_menu(&state.pool, Some("no-such-slug")).await?;
    assert!(menu.items.is_empty());

    Ok(())
}

#[tokio::test]
async fn checkout_preview_requires_a_non_empty_cart() -> anyhow::Result<()> {
    let Some(state) = setup().await? else {
        return Ok(());
    };

    let user = axum_restaurant_api::entity::users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(format!("preview-{}@example.com", Uuid::new_v4())),
        password_hash: Set("dummy".into()),
        first_name: Set("Pre".into()),
        last_name: Set("View".into()),
        role: Set("user".into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    let auth = AuthUser {
        user_id: user.id,
        role: "user".into(),
    };

    let err = order_service::checkout_preview(&state, &auth)
        .await
        .expect_err("empty cart has nothing to preview");
    assert!(matches!(err, AppError::BadRequest(_)));

    let slug = format!("preview-{}", Uuid::new_v4());
    let category = create_category(&state, &slug).await?;
    let item = create_item(&state, category, "Preview dish", true).await?;
    cart_service::add_to_cart(&state.pool, &auth, item).await?;

    let preview = order_service::checkout_preview(&state, &auth)
        .await?
        .data
        .expect("preview payload");
    assert_eq!(preview.full_name, "Pre View");
    assert_eq!(preview.email, user.email);
    assert_eq!(preview.cart.lines.len(), 1);

    Ok(())
}

#[tokio::test]
async fn reservation_is_recorded_unconfirmed() -> anyhow::Result<()> {
    let Some(state) = setup().await? else {
        return Ok(());
    };

    let request = ReservationForm {
        name: "Walk In".into(),
        email: "walkin@example.com".into(),
        date: NaiveDate::from_ymd_opt(2030, 12, 24).unwrap(),
        time_slot: "20:00".into(),
        party_size: 2,
        special_requests: Some("window table".into()),
    }
    .validate(NaiveDate::from_ymd_opt(2026, 8, 30).unwrap())
    .expect("fixture form should be valid");

    let reservation = reservation_service::create_reservation(&state.pool, request)
        .await?
        .data
        .expect("reservation payload");

    assert_eq!(reservation.time_slot, "20:00");
    assert_eq!(reservation.party_size, 2);
    assert!(!reservation.is_confirmed, "staff confirm out of band");

    Ok(())
}
