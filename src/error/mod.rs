//! Centralized API error handling for the Kinvest gateway
//!
//! Maps the gateway's failure classes onto HTTP statuses with the upstream
//! API's `{"error": ...}` body shape. Upstream business-rule rejections are
//! passed through with their original status and message; nothing here is
//! fatal to the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::client::ClientError;
use crate::services::ContributionError;

/// API error type with HTTP status code mapping
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Local duplicate-contribution refusal; no upstream call was made.
    #[error("{0}")]
    AlreadyRecorded(String),

    /// Upstream rejected the request; status and message pass through
    /// verbatim.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Failed to reach upstream API")]
    BadGateway,

    #[error("{0}")]
    Internal(String),
}

/// JSON error response body, matching the upstream's shape.
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AlreadyRecorded(_) => StatusCode::CONFLICT,
            ApiError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ApiError::BadGateway => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match &self {
            ApiError::Internal(_) | ApiError::BadGateway => {
                tracing::error!(error = %message, status = %status.as_u16(), "Server error occurred");
            }
            // Business-rule rejections are expected and recoverable.
            _ => {
                tracing::warn!(error = %message, status = %status.as_u16(), "Request failed");
            }
        }

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ClientError> for ApiError {
    fn from(error: ClientError) -> Self {
        match error {
            ClientError::MissingToken => {
                ApiError::Unauthorized("Missing auth token".to_string())
            }
            ClientError::Upstream { status, message } => ApiError::Upstream { status, message },
            ClientError::Transport(_) => ApiError::BadGateway,
        }
    }
}

impl From<ContributionError> for ApiError {
    fn from(error: ContributionError) -> Self {
        match error {
            ContributionError::InvalidAmount | ContributionError::NoCycleAvailable => {
                ApiError::Validation(error.to_string())
            }
            ContributionError::AlreadyRecorded => ApiError::AlreadyRecorded(error.to_string()),
            ContributionError::Client(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_status_passes_through() {
        let error: ApiError = ClientError::Upstream {
            status: 409,
            message: "Contribution already recorded for this cycle".to_string(),
        }
        .into();
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            error.to_string(),
            "Contribution already recorded for this cycle"
        );
    }

    #[test]
    fn missing_token_maps_to_unauthorized() {
        let error: ApiError = ClientError::MissingToken.into();
        assert_eq!(error.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn local_duplicate_gate_maps_to_conflict() {
        let error: ApiError = ContributionError::AlreadyRecorded.into();
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
        assert_eq!(error.to_string(), "You have already contributed to this cycle.");
    }

    #[test]
    fn validation_failures_map_to_bad_request() {
        let error: ApiError = ContributionError::InvalidAmount.into();
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }
}
