//! Basic client-token verification for game-server callers.
//!
//! Callers send `Authorization: basic <base64(clientId:secret)>`.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::warn;

use crate::config::ClientCredential;
use crate::error::ApiError;
use crate::http::AppState;
use crate::store::RecordStore;

const SCHEME: &str = "basic";

/// Check an `Authorization` header value against the allowed credentials.
pub fn verify_basic_token(
    header: Option<&str>,
    credentials: &[ClientCredential],
) -> Result<(), ApiError> {
    if credentials.is_empty() {
        return Ok(());
    }

    let header = header.ok_or_else(|| unauthorized("Authorization header is missing."))?;
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or_else(|| unauthorized("Authorization header is malformed."))?;
    if !scheme.eq_ignore_ascii_case(SCHEME) {
        return Err(unauthorized("Authorization header is malformed."));
    }

    let decoded = STANDARD
        .decode(token.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| unauthorized("Invalid basic token."))?;
    let (client_id, secret) = decoded
        .split_once(':')
        .ok_or_else(|| unauthorized("Invalid basic token."))?;

    if credentials
        .iter()
        .any(|c| c.client_id == client_id && c.secret == secret)
    {
        Ok(())
    } else {
        warn!(client_id, "rejected client credentials");
        Err(unauthorized("Invalid client credentials."))
    }
}

fn unauthorized(message: &str) -> ApiError {
    ApiError::Unauthorized(message.to_string())
}

/// Middleware rejecting requests without a valid basic token.
pub async fn require_basic_token<S: RecordStore>(
    State(state): State<Arc<AppState<S>>>,
    request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match verify_basic_token(header, &state.config.client_credentials) {
        Ok(()) => next.run(request).await,
        Err(err) => state.reject(request.uri(), &err).into_response(),
    }
}

/// Header value for `client_id:secret`.
pub fn basic_token(client_id: &str, secret: &str) -> String {
    format!("{} {}", SCHEME, STANDARD.encode(format!("{}:{}", client_id, secret)))
}
