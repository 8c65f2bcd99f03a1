use crate::domain::booking::{BookingOutcome, BookingRequest};
use crate::http::handlers::payments::error_response;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

pub async fn create_booking(
    State(state): State<AppState>,
    Json(req): Json<BookingRequest>,
) -> impl IntoResponse {
    match state.booking_service.create(req).await {
        Ok(booking) => (
            StatusCode::OK,
            Json(BookingOutcome {
                success: true,
                booking,
            }),
        )
            .into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.booking_service.get(booking_id).await {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}
