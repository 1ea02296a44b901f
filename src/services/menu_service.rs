use crate::{
    db::DbPool,
    dto::menu::{HomeResponse, MenuResponse},
    error::AppResult,
    models::{Category, MenuItem},
};

/// Landing page data: up to three featured dishes plus the category list.
pub async fn home(pool: &DbPool) -> AppResult<HomeResponse> {
    let featured_items = sqlx::query_as::<_, MenuItem>(
        r#"
        SELECT * FROM items
        WHERE available AND featured
        ORDER BY created_at
        LIMIT 3
        "#,
    )
    .fetch_all(pool)
    .await?;

    let categories = list_categories(pool).await?;

    Ok(HomeResponse {
        featured_items,
        categories,
    })
}

/// The browsable menu: available items, optionally narrowed to one category
/// slug. An unknown slug yields an empty item list, not an error.
pub async fn list_menu(pool: &DbPool, category_slug: Option<&str>) -> AppResult<MenuResponse> {
    let items = match category_slug {
        Some(slug) => {
            sqlx::query_as::<_, MenuItem>(
                r#"
                SELECT i.* FROM items i
                JOIN categories c ON c.id = i.category_id
                WHERE i.available AND c.slug = $1
                ORDER BY i.name
                "#,
            )
            .bind(slug)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, MenuItem>("SELECT * FROM items WHERE available ORDER BY name")
                .fetch_all(pool)
                .await?
        }
    };

    let categories = list_categories(pool).await?;

    Ok(MenuResponse { items, categories })
}

async fn list_categories(pool: &DbPool) -> AppResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(categories)
}
