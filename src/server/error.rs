//! HTTP error responses.

use crate::error::BarcError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// A [`BarcError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub BarcError);

impl From<BarcError> for ApiError {
    fn from(err: BarcError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BarcError::Auth(_) => StatusCode::UNAUTHORIZED,
            BarcError::UserError(_) => StatusCode::BAD_REQUEST,
            BarcError::NotFound(_) => StatusCode::NOT_FOUND,
            BarcError::BatchVetoed { .. } | BarcError::AlreadyExists(_) => StatusCode::CONFLICT,
            BarcError::PreflightFailed { .. } | BarcError::ExternalApi { .. } => {
                StatusCode::BAD_GATEWAY
            }
            BarcError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
            BarcError::ProtectedOperation(_) | BarcError::BranchFailures(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self.0 {
            BarcError::BatchVetoed { branches } => json!({
                "error": self.0.to_string(),
                "branches": branches,
            }),
            other => json!({ "error": other.to_string() }),
        };

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self.0, "request rejected");
        }

        (status, Json(body)).into_response()
    }
}
