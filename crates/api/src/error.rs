//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tally_core::ledger::LedgerError;
use tally_shared::AppError;
use thiserror::Error;
use tracing::error;

/// Error returned by handlers, rendered as `{ "error": code, "message": text }`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failure reported by the ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Request-level failure such as invalid input.
    #[error(transparent)]
    App(#[from] AppError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        let code = match self {
            Self::Ledger(e) => e.http_status_code(),
            Self::App(e) => e.status_code(),
        };
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Ledger(e) => e.error_code(),
            Self::App(e) => e.error_code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Server-side failures are logged in full and reported generically.
        let message = if status.is_server_error() {
            error!(error = %self, code = self.code(), "Request failed");
            "An error occurred".to_string()
        } else {
            self.to_string()
        };

        (
            status,
            Json(json!({
                "error": self.code(),
                "message": message
            })),
        )
            .into_response()
    }
}
