//! Reward lookup tables.
//!
//! The live game ships these as data files; the service only needs the two
//! lookups below. The built-in tables are a development stand-in.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Grant, GrantTarget};
use crate::profile::MTX_CURRENCY;

const VARIANT_TOKEN_PREFIX: &str = "cosmeticvarianttoken:";

/// Season level curve and per-level rewards.
pub trait SeasonRewardTable: Send + Sync {
    /// XP needed to go from `level` to `level + 1`, or `None` at the cap.
    fn xp_to_next(&self, level: i64) -> Option<u64>;

    /// Items granted on reaching `level`.
    fn rewards_at(&self, level: i64, purchased_vip: bool) -> Vec<Grant>;
}

/// Maps cosmetic variant tokens to the variant they unlock.
pub trait VariantTokenTable: Send + Sync {
    fn lookup(&self, token_template_id: &str) -> Option<VariantReward>;
}

/// The variant a token unlocks on a target cosmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantReward {
    pub template_id: String,
    pub channel: String,
    pub value: String,
}

/// One row of a [`StaticSeasonTable`]; row `n` describes level `n + 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelRow {
    pub xp_to_next: u64,
    #[serde(default)]
    pub free: Vec<Grant>,
    #[serde(default)]
    pub paid: Vec<Grant>,
}

/// A season table held in memory, built in code or loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticSeasonTable {
    pub levels: Vec<LevelRow>,
}

impl StaticSeasonTable {
    pub const BUILTIN_MAX_LEVEL: usize = 100;
    pub const BUILTIN_XP_PER_LEVEL: u64 = 80_000;

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Flat 80k-per-level curve: V-Bucks every tenth level, XP boosts every
    /// fifth, and a paid-track V-Buck drip on even levels.
    pub fn builtin() -> Self {
        let levels = (1..=Self::BUILTIN_MAX_LEVEL)
            .map(|level| {
                let mut row = LevelRow {
                    xp_to_next: Self::BUILTIN_XP_PER_LEVEL,
                    ..LevelRow::default()
                };
                if level % 10 == 0 {
                    row.free
                        .push(Grant::new(GrantTarget::CommonCore, MTX_CURRENCY, 100));
                } else if level % 5 == 0 {
                    row.free.push(Grant::new(
                        GrantTarget::SeasonXpBoost,
                        "Token:athenaseasonxpboost",
                        10,
                    ));
                }
                if level % 2 == 0 {
                    row.paid
                        .push(Grant::new(GrantTarget::CommonCore, MTX_CURRENCY, 100));
                }
                row
            })
            .collect();
        Self { levels }
    }

    fn row(&self, level: i64) -> Option<&LevelRow> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.levels.get(index)
    }
}

impl SeasonRewardTable for StaticSeasonTable {
    fn xp_to_next(&self, level: i64) -> Option<u64> {
        // The last row is the cap; it has no next level.
        if level >= self.levels.len() as i64 {
            return None;
        }
        self.row(level).map(|row| row.xp_to_next)
    }

    fn rewards_at(&self, level: i64, purchased_vip: bool) -> Vec<Grant> {
        let Some(row) = self.row(level) else {
            return Vec::new();
        };
        let mut grants = row.free.clone();
        if purchased_vip {
            grants.extend(row.paid.iter().cloned());
        }
        grants
    }
}

/// Token lookup keyed by the lower-cased token name.
#[derive(Debug, Clone, Default)]
pub struct StaticVariantTable {
    rewards: HashMap<String, VariantReward>,
}

impl StaticVariantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token; `token` may carry the `CosmeticVariantToken:` prefix.
    pub fn with(mut self, token: &str, reward: VariantReward) -> Self {
        self.rewards.insert(token_name(token), reward);
        self
    }

    pub fn builtin() -> Self {
        let entries: [(&str, &str, &str, &str); 12] = [
            ("VTID_655_RazerZero_StyleB", "AthenaCharacter:CID_RazerZero", "Progressive", "Stage2"),
            ("VTID_656_RazerZero_StyleC", "AthenaCharacter:CID_RazerZero", "Progressive", "Stage3"),
            ("VTID_949_Temple_StyleB", "AthenaCharacter:CID_Temple", "Material", "Mat2"),
            (
                "VTID_934_ProgressiveJonesy_Backbling_StyleB",
                "AthenaBackpack:BID_ProgressiveJonesy",
                "Progressive",
                "Stage2",
            ),
            (
                "VTID_935_ProgressiveJonesy_Backbling_StyleC",
                "AthenaBackpack:BID_ProgressiveJonesy",
                "Progressive",
                "Stage3",
            ),
            (
                "VTID_936_ProgressiveJonesy_Backbling_StyleD",
                "AthenaBackpack:BID_ProgressiveJonesy",
                "Progressive",
                "Stage4",
            ),
            (
                "VTID_937_ProgressiveJonesy_Backbling_StyleE",
                "AthenaBackpack:BID_ProgressiveJonesy",
                "Progressive",
                "Stage5",
            ),
            ("VTID_940_DinoHunter_StyleB", "AthenaCharacter:CID_DinoHunter", "Material", "Mat2"),
            (
                "VTID_933_ChickenWarrior_Backbling_StyleC",
                "AthenaBackpack:BID_ChickenWarrior",
                "Material",
                "Mat3",
            ),
            ("VTID_943_ChickenWarrior_StyleC", "AthenaCharacter:CID_ChickenWarrior", "Material", "Mat3"),
            (
                "VTID_956_ChickenWarriorGlider_StyleC",
                "AthenaGlider:Glider_ChickenWarrior",
                "Material",
                "Mat3",
            ),
            ("VTID_938_Obsidian_StyleB", "AthenaCharacter:CID_Obsidian", "Parts", "Stage2"),
        ];

        entries
            .into_iter()
            .fold(Self::new(), |table, (token, template_id, channel, value)| {
                table.with(
                    token,
                    VariantReward {
                        template_id: template_id.to_string(),
                        channel: channel.to_string(),
                        value: value.to_string(),
                    },
                )
            })
    }
}

impl VariantTokenTable for StaticVariantTable {
    fn lookup(&self, token_template_id: &str) -> Option<VariantReward> {
        self.rewards.get(&token_name(token_template_id)).cloned()
    }
}

fn token_name(token: &str) -> String {
    let lower = token.to_ascii_lowercase();
    match lower.strip_prefix(VARIANT_TOKEN_PREFIX) {
        Some(name) => name.to_string(),
        None => lower,
    }
}
