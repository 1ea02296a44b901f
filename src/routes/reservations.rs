use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    forms::ReservationForm,
    models::Reservation,
    response::ApiResponse,
    services::reservation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_reservation))
}

#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = ReservationForm,
    responses(
        (status = 200, description = "Reservation recorded, pending confirmation", body = ApiResponse<Reservation>),
        (status = 422, description = "Form failed validation"),
    ),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(form): Json<ReservationForm>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let request = form
        .validate(Utc::now().date_naive())
        .map_err(AppError::Validation)?;
    let resp = reservation_service::create_reservation(&state.pool, request).await?;
    Ok(Json(resp))
}
