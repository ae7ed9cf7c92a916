//! Reward resolution - turns match stats and XP into currency, levels and
//! item grants.
//!
//! Resolution is pure: a [`RewardResolver`] reads a profile's season list and
//! returns a [`RewardOutcome`]. Applying the outcome to profile documents is
//! the mutator's job (`crate::mutator`).

mod resolver;
mod tables;

use serde::{Deserialize, Serialize};

use crate::profile::{ItemAttributes, SeasonProgress};

pub use resolver::{match_currency, RewardResolver, ELIMINATION_REWARD, VICTORY_REWARD};
pub use tables::{
    LevelRow, SeasonRewardTable, StaticSeasonTable, StaticVariantTable, VariantReward,
    VariantTokenTable,
};

/// Where a granted item lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrantTarget {
    #[serde(rename = "athena")]
    Athena,
    #[serde(rename = "common_core")]
    CommonCore,
    #[serde(rename = "athenaseasonxpboost")]
    SeasonXpBoost,
    #[serde(rename = "athenaseasonfriendxpboost")]
    SeasonFriendXpBoost,
}

/// One item handed out by a reward table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    #[serde(rename = "type")]
    pub target: GrantTarget,
    pub template_id: String,
    #[serde(default = "one")]
    pub quantity: u64,
    #[serde(default)]
    pub attributes: ItemAttributes,
}

impl Grant {
    pub fn new(target: GrantTarget, template_id: impl Into<String>, quantity: u64) -> Self {
        Self {
            target,
            template_id: template_id.into(),
            quantity,
            attributes: ItemAttributes::default(),
        }
    }
}

fn one() -> u64 {
    1
}

/// Result of resolving one progression event against the current season.
///
/// `progress` is `None` when the account has no entry for the current
/// season; such an outcome changes nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardOutcome {
    pub currency_delta: u64,
    pub xp_delta: u64,
    pub level_delta: i64,
    pub book_level_delta: i64,
    pub wins_delta: u32,
    pub granted_items: Vec<Grant>,
    pub can_grant_items: bool,
    pub progress: Option<SeasonProgress>,
}

impl RewardOutcome {
    pub fn is_noop(&self) -> bool {
        self.progress.is_none()
    }
}
