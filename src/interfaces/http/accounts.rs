//! Account service routes, backed by an [`AccountLedger`].

use super::{ApiError, health};
use crate::application::ledger::AccountLedger;
use crate::domain::debit::DebitOutcome;
use crate::domain::ports::AccountSnapshot;
use crate::error::LedgerError;
use axum::extract::rejection::JsonRejection;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub owner_name: String,
    pub initial_balance: Option<Decimal>,
}

impl CreateAccountRequest {
    fn validate(&self) -> Result<Decimal, LedgerError> {
        let number_len = self.account_number.trim().chars().count();
        if number_len == 0 {
            return Err(LedgerError::invalid("Account number is required"));
        }
        if !(6..=20).contains(&number_len) {
            return Err(LedgerError::invalid(
                "Account number must be 6-20 characters",
            ));
        }
        let owner_len = self.owner_name.trim().chars().count();
        if owner_len == 0 {
            return Err(LedgerError::invalid("Owner name is required"));
        }
        if owner_len > 100 {
            return Err(LedgerError::invalid("Owner name must be 1-100 characters"));
        }
        let balance = self
            .initial_balance
            .ok_or_else(|| LedgerError::invalid("Initial balance is required"))?;
        if balance < Decimal::ZERO {
            return Err(LedgerError::invalid("Initial balance cannot be negative"));
        }
        Ok(balance)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DebitRequest {
    pub amount: Option<Decimal>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FreezeAccountRequest {
    pub reason: Option<String>,
}

/// Builds the account service router.
pub fn router(ledger: Arc<AccountLedger>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/accounts", post(create_account).get(list_accounts))
        .route("/api/v1/accounts/:account_number", get(get_account))
        .route("/api/v1/accounts/:account_number/debit", post(debit_account))
        .route("/api/v1/accounts/:account_number/freeze", post(freeze_account))
        .route(
            "/api/v1/accounts/:account_number/unfreeze",
            post(unfreeze_account),
        )
        .route("/api/v1/accounts/:account_number/close", post(close_account))
        .with_state(ledger)
}

/// GET /api/v1/accounts
async fn list_accounts(
    State(ledger): State<Arc<AccountLedger>>,
) -> ApiResult<Json<Vec<AccountSnapshot>>> {
    let accounts = ledger.list_accounts().await?;
    Ok(Json(accounts.iter().map(AccountSnapshot::from).collect()))
}

/// GET /api/v1/accounts/:account_number
async fn get_account(
    State(ledger): State<Arc<AccountLedger>>,
    Path(account_number): Path<String>,
) -> ApiResult<Json<AccountSnapshot>> {
    debug!(account = %account_number, "GET account");
    let account = ledger.get_account(&account_number).await?;
    Ok(Json(AccountSnapshot::from(&account)))
}

/// POST /api/v1/accounts
async fn create_account(
    State(ledger): State<Arc<AccountLedger>>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AccountSnapshot>)> {
    let Json(request) = payload?;
    debug!(account = %request.account_number, "POST account");

    let initial_balance = request.validate()?;
    let account = ledger
        .create_account(
            request.account_number.trim(),
            request.owner_name.trim(),
            initial_balance,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(AccountSnapshot::from(&account))))
}

/// POST /api/v1/accounts/:account_number/debit
///
/// Insufficient balance is a 200 with `success: false`.
async fn debit_account(
    State(ledger): State<Arc<AccountLedger>>,
    Path(account_number): Path<String>,
    payload: Result<Json<DebitRequest>, JsonRejection>,
) -> ApiResult<Json<DebitOutcome>> {
    let Json(request) = payload?;
    debug!(account = %account_number, amount = ?request.amount, "POST debit");

    let amount = request
        .amount
        .ok_or_else(|| LedgerError::invalid("Amount is required"))?;
    let outcome = ledger.debit(&account_number, amount).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/accounts/:account_number/freeze
///
/// The body is optional. When present it must be a JSON `FreezeAccountRequest`.
async fn freeze_account(
    State(ledger): State<Arc<AccountLedger>>,
    Path(account_number): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<AccountSnapshot>> {
    let request = freeze_request(&headers, &body)?;
    if let Some(reason) = &request.reason {
        debug!(account = %account_number, reason = %reason, "POST freeze");
    }

    let account = ledger.freeze(&account_number).await?;
    Ok(Json(AccountSnapshot::from(&account)))
}

fn freeze_request(headers: &HeaderMap, body: &[u8]) -> ApiResult<FreezeAccountRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(FreezeAccountRequest::default());
    }
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if !is_json {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Expected request with `Content-Type: application/json`",
        ));
    }

    let Json(request) = Json::<FreezeAccountRequest>::from_bytes(body)?;
    if let Some(reason) = &request.reason {
        if reason.chars().count() > 500 {
            return Err(LedgerError::invalid("Reason must be at most 500 characters").into());
        }
    }
    Ok(request)
}

/// POST /api/v1/accounts/:account_number/unfreeze
async fn unfreeze_account(
    State(ledger): State<Arc<AccountLedger>>,
    Path(account_number): Path<String>,
) -> ApiResult<Json<AccountSnapshot>> {
    let account = ledger.unfreeze(&account_number).await?;
    Ok(Json(AccountSnapshot::from(&account)))
}

/// POST /api/v1/accounts/:account_number/close
async fn close_account(
    State(ledger): State<Arc<AccountLedger>>,
    Path(account_number): Path<String>,
) -> ApiResult<Json<AccountSnapshot>> {
    let account = ledger.close(&account_number).await?;
    Ok(Json(AccountSnapshot::from(&account)))
}
