//! HTTP error mapping

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::errors::ScanError;
use crate::presentation::models::{ErrorBody, ErrorResponse};

/// Total status-code mapping over the error kind enumeration. Every failure
/// surfaces a structured body; the service never returns an unclassified 5xx.
impl IntoResponse for ScanError {
    fn into_response(self) -> Response {
        let status = match &self {
            ScanError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            ScanError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ScanError::ScanTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ScanError::RegistryUnreachable(_) => StatusCode::BAD_GATEWAY,
            ScanError::ScanFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ScanError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            error: ErrorBody {
                kind: self.kind().to_string(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
