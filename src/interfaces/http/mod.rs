//! HTTP surfaces for the account service and the payment service.

pub mod accounts;
pub mod payments;

use crate::error::{LedgerError, RemoteError};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Body of every non-2xx response produced by these services.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    pub message: String,
}

/// An error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// HTTP status for each ledger error kind.
pub fn ledger_status(e: &LedgerError) -> StatusCode {
    match e {
        LedgerError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::DuplicateAccount(_) => StatusCode::CONFLICT,
        LedgerError::Frozen(_) => StatusCode::FORBIDDEN,
        LedgerError::Closed(_) => StatusCode::FORBIDDEN,
        LedgerError::InvalidStateTransition { .. } => StatusCode::CONFLICT,
        LedgerError::Conflict(_) => StatusCode::CONFLICT,
        LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        let status = ledger_status(&e);
        let message = match e {
            // storage details stay in the logs
            LedgerError::Storage(source) => {
                error!(error = %source, "storage failure");
                "An unexpected error occurred".to_string()
            }
            other => other.to_string(),
        };
        Self::new(status, message)
    }
}

impl From<RemoteError> for ApiError {
    fn from(e: RemoteError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), message = %self.message, "request failed");
        } else {
            warn!(status = self.status.as_u16(), message = %self.message, "request rejected");
        }

        let body = ErrorResponse {
            status: self.status.as_u16(),
            error: self
                .status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "UP" }))
}
