//! Payment service routes, backed by a [`PaymentOrchestrator`].

use super::{ApiError, health};
use crate::application::orchestrator::PaymentOrchestrator;
use crate::domain::payment::{PaymentRequest, PaymentResult, PaymentStatus};
use crate::domain::ports::AccountSnapshot;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tracing::debug;

/// Transport status for a payment outcome.
pub fn payment_http_status(status: PaymentStatus) -> StatusCode {
    match status {
        PaymentStatus::Success => StatusCode::OK,
        PaymentStatus::Failed => StatusCode::BAD_REQUEST,
        PaymentStatus::Error => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Builds the payment service router.
pub fn router(orchestrator: Arc<PaymentOrchestrator>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/payments", post(process_payment))
        .route("/api/v1/payments/accounts/:account_number", get(get_account))
        .with_state(orchestrator)
}

/// POST /api/v1/payments
async fn process_payment(
    State(orchestrator): State<Arc<PaymentOrchestrator>>,
    payload: Result<Json<PaymentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PaymentResult>), ApiError> {
    let Json(request) = payload?;
    debug!(
        account = %request.account_number,
        amount = ?request.amount,
        description = ?request.description,
        "POST payment"
    );

    let amount = request.validate()?;
    let result = orchestrator
        .process_payment(&request.account_number, amount)
        .await;
    Ok((payment_http_status(result.status), Json(result)))
}

/// GET /api/v1/payments/accounts/:account_number
async fn get_account(
    State(orchestrator): State<Arc<PaymentOrchestrator>>,
    Path(account_number): Path<String>,
) -> Result<Json<AccountSnapshot>, ApiError> {
    debug!(account = %account_number, "GET payment account");
    let account = orchestrator.get_account(&account_number).await?;
    Ok(Json(account))
}
