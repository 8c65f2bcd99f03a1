use crate::domain::payment::{ErrorBody, ProcessPaymentRequest};
use crate::error::PaymentError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

pub async fn create_payment(
    State(state): State<AppState>,
    Json(req): Json<ProcessPaymentRequest>,
) -> impl IntoResponse {
    match state.payment_service.process(req).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}

pub async fn get_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.payment_service.get(payment_id).await {
        Ok(payment) => (StatusCode::OK, Json(payment)).into_response(),
        Err(err) => error_response(&err).into_response(),
    }
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub fn error_response(err: &PaymentError) -> (StatusCode, Json<ErrorBody>) {
    let status = match err {
        PaymentError::Validation(_) => StatusCode::BAD_REQUEST,
        PaymentError::NotFound(_) => StatusCode::NOT_FOUND,
        PaymentError::Gateway { .. } => StatusCode::BAD_GATEWAY,
        PaymentError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(ErrorBody {
            success: false,
            message: err.to_string(),
            error: err.first_gateway_error().cloned(),
        }),
    )
}
