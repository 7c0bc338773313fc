use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use payroll_core::PayrollError;
use thiserror::Error;

use super::dto::ErrorResponse;
use super::json_response;

/// Failures a handler reports to the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Body was not valid JSON for the endpoint, or a field was out of range.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Payroll(#[from] PayrollError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Payroll(PayrollError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Payroll(PayrollError::NonConvergent { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Payroll(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(%status, error = %self, "request rejected");
        }
        json_response(status, ErrorResponse::new(self.to_string()))
    }
}
