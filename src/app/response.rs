use crate::utils::error::{ContactError, Violation};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
}

impl From<&ContactError> for ErrorBody {
    fn from(err: &ContactError) -> Self {
        Self {
            status: err.status_code(),
            error: err.kind(),
            message: err.to_string(),
            violations: err.violations().map(<[Violation]>::to_vec),
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_client_error() {
            tracing::warn!(kind = self.kind(), "Request rejected: {}", self);
        } else {
            tracing::error!(kind = self.kind(), "Request failed: {}", self);
        }

        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
