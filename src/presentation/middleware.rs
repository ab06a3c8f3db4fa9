//! Request middleware

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::domain::errors::ScanError;
use crate::presentation::controllers::AppState;

const API_KEY_HEADER: &str = "x-api-key";

/// API-key enforcement for scan endpoints.
///
/// Only layered onto the router when `auth.require_api_key` is set; normally
/// the gateway in front of this service owns credential checks. Runs before
/// the handler, so an unauthorized request never reaches validation or the
/// scanner.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.auth.api_key.as_deref() else {
        // require_api_key without a key is rejected at config validation;
        // treat the combination as a server-side fault rather than open access.
        return ScanError::InternalError("API key enforcement misconfigured".to_string())
            .into_response();
    };

    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .or_else(|| bearer_token(&request));

    match presented {
        Some(key) if key == expected => next.run(request).await,
        Some(_) => ScanError::Unauthorized("invalid API key".to_string()).into_response(),
        None => {
            ScanError::Unauthorized(format!("missing {} header", API_KEY_HEADER)).into_response()
        }
    }
}

fn bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned)
}
