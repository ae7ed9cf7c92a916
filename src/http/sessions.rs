use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{OriginalUri, Path, State};
use axum::response::Response;
use serde::{Deserialize, Serialize};

use super::{parse_body, respond, AppState};
use crate::error::ApiError;
use crate::session::{CreateSession, SessionRecord, SessionStatus};
use crate::store::RecordStore;

const INVALID_JSON: &str = "Body isn't valid JSON";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetStatusRequest {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusChanged {
    message: String,
}

pub(super) async fn create<S: RecordStore>(
    State(state): State<Arc<AppState<S>>>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Response {
    let result = parse_body::<CreateSession>(&body, INVALID_JSON).and_then(|request| {
        state
            .sessions
            .create(request)
            .map_err(|err| ApiError::from(err).or_internal("Failed to create server."))
    });
    respond(&state, &uri, result)
}

pub(super) async fn list<S: RecordStore>(
    State(state): State<Arc<AppState<S>>>,
    OriginalUri(uri): OriginalUri,
) -> Response {
    let result = state
        .sessions
        .list()
        .map_err(|err| ApiError::from(err).or_internal("Failed to list servers."));
    respond(&state, &uri, result)
}

pub(super) async fn get<S: RecordStore>(
    State(state): State<Arc<AppState<S>>>,
    OriginalUri(uri): OriginalUri,
    Path(session_id): Path<String>,
) -> Response {
    let result = state
        .sessions
        .get_by_session_id(&session_id)
        .map_err(|err| ApiError::from(err).or_internal("Failed to list servers."))
        .and_then(|found| found.ok_or_else(|| ApiError::NotFound("Server not found.".into())));
    respond(&state, &uri, result)
}

pub(super) async fn set_status<S: RecordStore>(
    State(state): State<Arc<AppState<S>>>,
    OriginalUri(uri): OriginalUri,
    body: Bytes,
) -> Response {
    let result = parse_body::<SetStatusRequest>(&body, INVALID_JSON)
        .and_then(|request| change_status(&state, request));
    respond(&state, &uri, result)
}

fn change_status<S: RecordStore>(
    state: &AppState<S>,
    request: SetStatusRequest,
) -> Result<StatusChanged, ApiError> {
    let raw = request.status.unwrap_or_default();
    let rejected = || ApiError::Validation(format!("Failed to set server status to '{}'", raw));

    let status: SessionStatus = raw.parse().map_err(|_| rejected())?;
    let session_id = request.session_id.ok_or_else(rejected)?;

    let record: SessionRecord = state
        .sessions
        .set_status(&session_id, status)
        .map_err(|err| match ApiError::from(err) {
            ApiError::NotFound(_) => rejected(),
            other => other.or_internal("Failed to set server status."),
        })?;

    Ok(StatusChanged {
        message: format!("Successfully set server status to '{}'", record.status),
    })
}
