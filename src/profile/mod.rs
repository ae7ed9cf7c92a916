//! Player profiles - named JSON-shaped documents holding items, currencies and
//! season progress for one game subsystem.
//!
//! A profile is keyed by `(account id, profile id)`. Its `rvn` is the revision
//! the client reconciles against: it moves by exactly one for every persisted
//! mutation batch (see [`ProfileStore::persist`]).

mod change;
mod item;
mod lenient;
mod season;
mod store;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::Record;

pub use change::ProfileChange;
pub use item::{
    GiftBox, GiftBoxAttributes, Item, ItemAttributes, ItemKind, LootEntry, VariantChannel,
    BATTLEPASS_GIFT_BOX, CURRENCY_MARKER, MTX_CURRENCY,
};
pub use season::{SeasonProgress, DEFAULT_LEVEL, DEFAULT_XP};
pub use store::ProfileStore;

/// The fixed set of profile documents an account can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileId {
    Athena,
    CommonCore,
    Creative,
    CommonPublic,
    Profile0,
    Campaign,
    Metadata,
    Theater0,
    CollectionBookPeople0,
    CollectionBookSchematics0,
    Outpost0,
    Collections,
}

impl ProfileId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileId::Athena => "athena",
            ProfileId::CommonCore => "common_core",
            ProfileId::Creative => "creative",
            ProfileId::CommonPublic => "common_public",
            ProfileId::Profile0 => "profile0",
            ProfileId::Campaign => "campaign",
            ProfileId::Metadata => "metadata",
            ProfileId::Theater0 => "theater0",
            ProfileId::CollectionBookPeople0 => "collection_book_people0",
            ProfileId::CollectionBookSchematics0 => "collection_book_schematics0",
            ProfileId::Outpost0 => "outpost0",
            ProfileId::Collections => "collections",
        }
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub account_id: String,
    pub profile_id: ProfileId,
    #[serde(default)]
    pub rvn: u64,
    #[serde(default)]
    pub command_revision: u64,
    #[serde(default)]
    pub items: BTreeMap<String, Item>,
    #[serde(default)]
    pub stats: ProfileStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    #[serde(default)]
    pub attributes: ProfileAttributes,
}

/// Profile-level attributes. Only the fields the reward flow touches are
/// typed; anything else rides along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileAttributes {
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub xp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int", skip_serializing_if = "Option::is_none")]
    pub book_level: Option<i64>,
    #[serde(
        default,
        rename = "accountLevel",
        deserialize_with = "lenient::int",
        skip_serializing_if = "Option::is_none"
    )]
    pub account_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_match_boost: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_friend_match_boost: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_xp_interaction: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub past_seasons: Vec<SeasonProgress>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gifts: Vec<GiftBox>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    pub fn new(account_id: impl Into<String>, profile_id: ProfileId) -> Self {
        Self {
            account_id: account_id.into(),
            profile_id,
            rvn: 1,
            command_revision: 0,
            items: BTreeMap::new(),
            stats: ProfileStats::default(),
        }
    }

    /// A fresh `athena` profile enrolled in `season`.
    pub fn athena(account_id: impl Into<String>, season: u32) -> Self {
        let mut profile = Self::new(account_id, ProfileId::Athena);
        let attributes = &mut profile.stats.attributes;
        attributes.level = Some(DEFAULT_LEVEL);
        attributes.xp = Some(DEFAULT_XP);
        attributes.book_level = Some(DEFAULT_LEVEL);
        attributes.account_level = Some(DEFAULT_LEVEL);
        attributes.past_seasons.push(SeasonProgress::new(season));
        profile
    }

    /// A fresh `common_core` profile with an empty premium currency stack.
    pub fn common_core(account_id: impl Into<String>) -> Self {
        let mut profile = Self::new(account_id, ProfileId::CommonCore);
        profile
            .items
            .insert(MTX_CURRENCY.to_string(), Item::new(MTX_CURRENCY, 0));
        profile
    }

    pub fn store_key(account_id: &str, profile_id: ProfileId) -> String {
        format!("{}:{}", account_id, profile_id)
    }

    pub fn attributes(&self) -> &ProfileAttributes {
        &self.stats.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut ProfileAttributes {
        &mut self.stats.attributes
    }
}

impl Record for Profile {
    const TABLE: &'static str = "profiles";

    fn key(&self) -> String {
        Profile::store_key(&self.account_id, self.profile_id)
    }
}
