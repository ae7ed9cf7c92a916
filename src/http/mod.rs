//! HTTP transport - axum routes for the session directory and reward grants.
//!
//! ## Routes
//!
//! - `POST /gamesessions/create` - register a game-server session.
//! - `GET  /gamesessions/list` - every registered session.
//! - `GET  /gamesessions/list/:sessionId` - one session.
//! - `POST /gamesessions/setStatus` - update a session's status.
//! - `POST /gamesessions/stats/vbucks/:username/:sessionId/:eliminations` - match currency.
//! - `POST /gamesessions/levels/:username/:sessionId/:totalXp` - season XP and level-up grants.
//! - `GET  /health` - `{ "ok": true }`.
//!
//! Everything under `/gamesessions` sits behind basic-token auth. Failures
//! render as [`ErrorBody`](crate::error::ErrorBody).
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use gamesessions::{http, Config, InMemoryRecordStore};
//!
//! let state = Arc::new(http::AppState::new(Config::default(), InMemoryRecordStore::new()));
//!
//! // Compose with other axum routes
//! let app = http::router(state.clone());
//!
//! // Or serve directly
//! http::serve(state, "0.0.0.0:3551").await?;
//! ```

mod rewards;
mod sessions;
mod state;

use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::http::Uri;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::auth::require_basic_token;
use crate::error::ApiError;
use crate::store::RecordStore;

pub use state::AppState;

/// Build the service router over `state`.
pub fn router<S: RecordStore>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/gamesessions/create", post(sessions::create::<S>))
        .route("/gamesessions/list", get(sessions::list::<S>))
        .route("/gamesessions/list/:session_id", get(sessions::get::<S>))
        .route("/gamesessions/setStatus", post(sessions::set_status::<S>))
        .route(
            "/gamesessions/stats/vbucks/:username/:session_id/:eliminations",
            post(rewards::match_stats::<S>),
        )
        .route(
            "/gamesessions/levels/:username/:session_id/:total_xp",
            post(rewards::levels::<S>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_basic_token::<S>,
        ))
        .route("/health", get(health))
        .layer(middleware::from_fn(trace_request))
        .with_state(state)
}

/// Serve at `addr` (e.g. `"0.0.0.0:3551"`) until ctrl-c.
pub async fn serve<S: RecordStore>(
    state: Arc<AppState<S>>,
    addr: &str,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "gamesessions listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

/// Wrap each request in a span carrying a fresh request id.
async fn trace_request(request: Request, next: Next) -> Response {
    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        let started = Instant::now();
        let response = next.run(request).await;
        info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request finished"
        );
        response
    }
    .instrument(span)
    .await
}

fn respond<S: RecordStore, T: Serialize>(
    state: &AppState<S>,
    uri: &Uri,
    result: Result<T, ApiError>,
) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(err) => state.reject(uri, &err).into_response(),
    }
}

fn parse_body<T: DeserializeOwned>(body: &[u8], message: &str) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::Validation(message.to_string()))
}
