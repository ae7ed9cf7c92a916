use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{OriginalUri, Path, State};
use axum::response::Response;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use super::{parse_body, respond, AppState};
use crate::accounts::Account;
use crate::error::ApiError;
use crate::notify::PresenceMessage;
use crate::profile::{Profile, ProfileId};
use crate::response::{generate, ProfileResponse};
use crate::store::RecordStore;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchResult {
    #[serde(default)]
    is_victory: bool,
}

/// `POST /gamesessions/stats/vbucks/:username/:session_id/:eliminations`
pub(super) async fn match_stats<S: RecordStore>(
    State(state): State<Arc<AppState<S>>>,
    OriginalUri(uri): OriginalUri,
    Path((username, session_id, eliminations)): Path<(String, String, String)>,
    body: Bytes,
) -> Response {
    let result = award_match_stats(&state, &username, &session_id, &eliminations, &body).await;
    respond(&state, &uri, result)
}

/// `POST /gamesessions/levels/:username/:session_id/:total_xp`
///
/// The session id is part of the route but not checked.
pub(super) async fn levels<S: RecordStore>(
    State(state): State<Arc<AppState<S>>>,
    OriginalUri(uri): OriginalUri,
    Path((username, _session_id, total_xp)): Path<(String, String, String)>,
) -> Response {
    let result = award_xp(&state, &username, &total_xp).await;
    respond(&state, &uri, result)
}

async fn award_match_stats<S: RecordStore>(
    state: &AppState<S>,
    username: &str,
    session_id: &str,
    eliminations: &str,
    body: &[u8],
) -> Result<ProfileResponse, ApiError> {
    let eliminations: u32 = eliminations
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation("Eliminations must be a valid number.".into()))?;

    let account = find_account(state, username)?;
    if state.sessions.get_by_session_id(session_id)?.is_none() {
        return Err(ApiError::NotFound("Session not found!".into()));
    }
    let MatchResult { is_victory } = parse_body(body, "Body isn't Valid JSON!")?;

    let _guard = state.locks.acquire(&account.account_id).await?;
    let (mut athena, mut common_core) = load_profiles(state, &account)?;

    let outcome = state.resolver.resolve_match_stats(
        &athena.attributes().past_seasons,
        eliminations,
        is_victory,
    );
    let report = state
        .mutator
        .apply_match_stats(&mut athena, &mut common_core, &outcome);

    if report.common_core_changed() {
        state.profiles.persist(&mut common_core)?;
    }
    if report.athena_changed() {
        state.profiles.persist(&mut athena)?;
    }

    info!(
        account_id = %account.account_id,
        eliminations,
        is_victory,
        currency = outcome.currency_delta,
        "match stats applied"
    );
    Ok(generate(
        &common_core,
        report.common_core_changes,
        ProfileId::CommonCore,
    ))
}

async fn award_xp<S: RecordStore>(
    state: &AppState<S>,
    username: &str,
    total_xp: &str,
) -> Result<ProfileResponse, ApiError> {
    let total_xp: u64 = total_xp
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation("totalXp must be a valid number.".into()))?;

    let account = find_account(state, username)?;

    let _guard = state.locks.acquire(&account.account_id).await?;
    let (mut athena, mut common_core) = load_profiles(state, &account)?;

    let outcome = state
        .resolver
        .resolve_xp(&athena.attributes().past_seasons, total_xp);
    let report = state
        .mutator
        .apply_xp(&mut athena, &mut common_core, &outcome, Utc::now());

    if report.athena_changed() {
        state.profiles.persist(&mut athena)?;
    }
    if report.common_core_changed() {
        state.profiles.persist(&mut common_core)?;
    }

    if report.gift_granted {
        if let Err(err) = state
            .notifier
            .notify(&account.account_id, &PresenceMessage::gift_received())
        {
            warn!(account_id = %account.account_id, error = %err, "gift notification failed");
        }
    }

    info!(
        account_id = %account.account_id,
        total_xp,
        levels = outcome.level_delta,
        items = outcome.granted_items.len(),
        "season xp applied"
    );
    Ok(generate(&athena, report.athena_changes, ProfileId::Athena))
}

fn find_account<S: RecordStore>(state: &AppState<S>, username: &str) -> Result<Account, ApiError> {
    state
        .accounts
        .find_by_username(username)?
        .ok_or_else(|| ApiError::NotFound("User not found!".into()))
}

fn load_profiles<S: RecordStore>(
    state: &AppState<S>,
    account: &Account,
) -> Result<(Profile, Profile), ApiError> {
    let load = |profile_id: ProfileId| -> Result<Profile, ApiError> {
        state
            .profiles
            .load(&account.account_id, profile_id)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Profile '{}' was not found!", profile_id))
            })
    };
    Ok((load(ProfileId::Athena)?, load(ProfileId::CommonCore)?))
}
