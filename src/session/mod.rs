//! Game-server sessions - the registry dedicated servers announce themselves
//! to and report status through.

mod directory;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{Record, StoreError};

pub use directory::SessionDirectory;

/// Lifecycle of a game-server session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    #[default]
    Created,
    Waiting,
    InProgress,
    Ended,
    Offline,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Created => "created",
            SessionStatus::Waiting => "waiting",
            SessionStatus::InProgress => "in-progress",
            SessionStatus::Ended => "ended",
            SessionStatus::Offline => "offline",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = SessionError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        [
            SessionStatus::Created,
            SessionStatus::Waiting,
            SessionStatus::InProgress,
            SessionStatus::Ended,
            SessionStatus::Offline,
        ]
        .into_iter()
        .find(|status| status.as_str() == raw)
        .ok_or_else(|| SessionError::Validation(format!("unknown session status '{}'", raw)))
    }
}

/// A registered game-server session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    pub status: SessionStatus,
    pub version: u32,
    pub address: String,
    pub port: u16,
    pub identifier: String,
    #[serde(default)]
    pub options: Value,
}

impl Record for SessionRecord {
    const TABLE: &'static str = "game_sessions";

    fn key(&self) -> String {
        self.session_id.clone()
    }
}

/// Registration payload as sent by a game server.
///
/// `version` and `port` arrive as JSON numbers or numeric strings depending
/// on the server build, so they stay untyped until validated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSession {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub version: Value,
    #[serde(default)]
    pub port: Value,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub options: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("{0}")]
    Validation(String),
    #[error("session not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Integer from a JSON number or a string holding one.
pub(crate) fn parse_int<T: TryFrom<i64>>(value: &Value) -> Option<T> {
    let raw = match value {
        Value::Number(number) => number.as_i64()?,
        Value::String(text) => text.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    T::try_from(raw).ok()
}
