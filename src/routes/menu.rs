use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::menu::MenuResponse,
    error::AppResult,
    response::{ApiResponse, Meta},
    routes::params::MenuQuery,
    services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_menu))
}

#[utoipa::path(
    get,
    path = "/api/menu",
    params(
        ("category" = Option<String>, Query, description = "Category slug filter")
    ),
    responses(
        (status = 200, description = "Available menu items and categories", body = ApiResponse<MenuResponse>)
    ),
    tag = "Menu"
)]
pub async fn list_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ApiResponse<MenuResponse>>> {
    let data = menu_service::list_menu(&state.pool, query.category.as_deref()).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}
