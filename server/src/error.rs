//! Mapping of ledger failures onto HTTP responses.

use std::fmt::Display;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use bankledger_common::LedgerError;

/// Client message for snapshot read/write failures.
const STORAGE_FAILURE: &str = "Snapshot storage is unavailable";

/// Client message for failures inside the server.
const INTERNAL_FAILURE: &str = "Internal server error";

/// An error ready to be returned to an HTTP client.
#[derive(Debug)]
pub struct ApiError {
    /// Response status.
    pub status: StatusCode,
    /// Stable error code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Report a rejected mutation. Every client-caused failure becomes 400,
    /// including an unknown account name.
    pub fn rejected(err: LedgerError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self::from_ledger(status, err)
    }

    /// Report a failure inside the server itself. The detail is logged, not returned.
    pub fn internal(detail: impl Display) -> Self {
        error!(error = %detail, "Internal failure");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            INTERNAL_FAILURE,
        )
    }

    fn from_ledger(status: StatusCode, err: LedgerError) -> Self {
        let message = match &err {
            LedgerError::Io(detail) => {
                error!(error = %detail, "Snapshot storage failure");
                STORAGE_FAILURE.to_string()
            }
            _ => err.to_string(),
        };
        Self::new(status, err.error_code(), message)
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        let status = match &err {
            LedgerError::AccountNotFound(_) | LedgerError::SnapshotNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            LedgerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::from_ledger(status, err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_REQUEST", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, error = %self.message, "Request failed");
        } else {
            warn!(code = self.code, error = %self.message, "Request rejected");
        }

        let body = Json(json!({
            "error": self.message,
            "code": self.code,
        }));
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = ApiError::from(LedgerError::AccountNotFound("Bob".into()));
        assert_eq!(not_found.status, StatusCode::NOT_FOUND);
        assert_eq!(not_found.code, "ACCOUNT_NOT_FOUND");

        let duplicate = ApiError::from(LedgerError::DuplicateAccount("Bob".into()));
        assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);

        let missing = ApiError::from(LedgerError::SnapshotNotFound("data/accounts.csv".into()));
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let io = ApiError::from(LedgerError::Io("disk full".into()));
        assert_eq!(io.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_rejected_mutations_are_bad_requests() {
        let err = ApiError::rejected(LedgerError::AccountNotFound("Bob".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "ACCOUNT_NOT_FOUND");

        let err = ApiError::rejected(LedgerError::Io("disk full".into()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_details_stay_out_of_messages() {
        let io = ApiError::from(LedgerError::Io(
            "No such file or directory (os error 2)".into(),
        ));
        assert_eq!(io.code, "IO_ERROR");
        assert_eq!(io.message, "Snapshot storage is unavailable");

        let missing = ApiError::from(LedgerError::SnapshotNotFound("/srv/bank/accounts.csv".into()));
        assert_eq!(missing.message, "No saved state found");

        let internal = ApiError::internal("task panicked");
        assert_eq!(internal.message, "Internal server error");
    }
}
