use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;

pub const DEFAULT_LEVEL: i64 = 1;
pub const DEFAULT_XP: i64 = 0;

/// Per-season progression stored under `athena.stats.attributes.past_seasons`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonProgress {
    pub season_number: u32,
    #[serde(default)]
    pub num_wins: u32,
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub season_xp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub season_level: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub book_xp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub book_level: Option<i64>,
    #[serde(default, rename = "purchasedVIP")]
    pub purchased_vip: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SeasonProgress {
    pub fn new(season_number: u32) -> Self {
        Self {
            season_number,
            num_wins: 0,
            season_xp: Some(DEFAULT_XP),
            season_level: Some(DEFAULT_LEVEL),
            book_xp: Some(DEFAULT_XP),
            book_level: Some(DEFAULT_LEVEL),
            purchased_vip: false,
            extra: Map::new(),
        }
    }

    /// Copy with every unreadable numeric field reset to its default. Levels
    /// below [`DEFAULT_LEVEL`] count as unreadable.
    pub fn normalized(&self) -> Self {
        Self {
            season_xp: Some(self.xp()),
            season_level: Some(self.level()),
            book_xp: Some(self.book_xp.unwrap_or(DEFAULT_XP)),
            book_level: Some(self.book_level()),
            ..self.clone()
        }
    }

    pub fn xp(&self) -> i64 {
        self.season_xp.unwrap_or(DEFAULT_XP)
    }

    pub fn level(&self) -> i64 {
        valid_level(self.season_level)
    }

    pub fn book_level(&self) -> i64 {
        valid_level(self.book_level)
    }
}

fn valid_level(level: Option<i64>) -> i64 {
    level
        .filter(|level| *level >= DEFAULT_LEVEL)
        .unwrap_or(DEFAULT_LEVEL)
}
