use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::extract::ValidatedJson;
use crate::domain::TransactionView;
use crate::error::AppError;
use crate::schemas::{AuthorizeRequest, TransactionRequest};
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/payments/authorize",
    request_body = AuthorizeRequest,
    responses(
        (status = 201, description = "Authorization recorded (approved or declined)", body = TransactionView),
        (status = 400, description = "Malformed request")
    ),
    tag = "Payments"
)]
pub async fn authorize(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AuthorizeRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::info!("Received authorization request");

    let view = state.payments.authorize(payload).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    post,
    path = "/api/payments/capture",
    request_body = TransactionRequest,
    responses(
        (status = 200, description = "Transaction captured", body = TransactionView),
        (status = 400, description = "Malformed request"),
        (status = 404, description = "Unknown transaction id"),
        (status = 409, description = "Transaction is not AUTHORIZED")
    ),
    tag = "Payments"
)]
pub async fn capture(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TransactionRequest>,
) -> Result<Json<TransactionView>, AppError> {
    tracing::info!(
        "Received capture request for transaction: {}",
        payload.transaction_id
    );

    let view = state
        .payments
        .capture(&payload.transaction_id)
        .await
        .map_err(|e| {
            tracing::error!("Capture failed: {}", e);
            e
        })?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/api/payments/refund",
    request_body = TransactionRequest,
    responses(
        (status = 200, description = "Transaction refunded", body = TransactionView),
        (status = 400, description = "Malformed request"),
        (status = 404, description = "Unknown transaction id"),
        (status = 409, description = "Transaction is not CAPTURED")
    ),
    tag = "Payments"
)]
pub async fn refund(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TransactionRequest>,
) -> Result<Json<TransactionView>, AppError> {
    tracing::info!(
        "Received refund request for transaction: {}",
        payload.transaction_id
    );

    let view = state
        .payments
        .refund(&payload.transaction_id)
        .await
        .map_err(|e| {
            tracing::error!("Refund failed: {}", e);
            e
        })?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    params(("id" = i64, Path, description = "Surrogate transaction id")),
    responses(
        (status = 200, description = "Transaction found", body = TransactionView),
        (status = 404, description = "Transaction not found")
    ),
    tag = "Payments"
)]
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TransactionView>, AppError> {
    tracing::info!("Received request to fetch transaction: {}", id);
    Ok(Json(state.payments.get_transaction(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/payments/history",
    responses(
        (status = 200, description = "Up to 20 most recent transactions", body = [TransactionView])
    ),
    tag = "Payments"
)]
pub async fn history(State(state): State<AppState>) -> Result<Json<Vec<TransactionView>>, AppError> {
    tracing::info!("Received request to fetch transaction history");
    Ok(Json(state.payments.history().await?))
}
