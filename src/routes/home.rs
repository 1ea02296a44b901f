use axum::{Json, extract::State};

use crate::{
    dto::menu::HomeResponse,
    error::AppResult,
    response::{ApiResponse, Meta},
    services::menu_service,
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Featured items and categories", body = ApiResponse<HomeResponse>)
    ),
    tag = "Menu"
)]
pub async fn index(State(state): State<AppState>) -> AppResult<Json<ApiResponse<HomeResponse>>> {
    let data = menu_service::home(&state.pool).await?;
    Ok(Json(ApiResponse::success("OK", data, Some(Meta::empty()))))
}
