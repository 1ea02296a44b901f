use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppResult,
    forms::ReservationRequest,
    models::Reservation,
    response::{ApiResponse, Meta},
};

/// Record a table booking. It lands unconfirmed; staff confirm out of band.
pub async fn create_reservation(
    pool: &DbPool,
    request: ReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    let reservation: Reservation = sqlx::query_as(
        r#"
        INSERT INTO reservations (id, name, email, date, time_slot, party_size, special_requests)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&request.name)
    .bind(&request.email)
    .bind(request.date)
    .bind(&request.time_slot)
    .bind(request.party_size)
    .bind(&request.special_requests)
    .fetch_one(pool)
    .await?;

    tracing::info!(reservation_id = %reservation.id, date = %reservation.date, "reservation created");

    Ok(ApiResponse::success(
        "Reservation received",
        reservation,
        Some(Meta::empty()),
    ))
}
