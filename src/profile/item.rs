use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Template marker for stackable currencies.
pub const CURRENCY_MARKER: &str = "Currency";
/// Premium currency credited by match stats.
pub const MTX_CURRENCY: &str = "Currency:MtxPurchased";
/// Gift box dropped into `common_core` when a level-up grants loot.
pub const BATTLEPASS_GIFT_BOX: &str = "GiftBox:gb_battlepass";

const VARIANT_TOKEN_PREFIX: &str = "cosmeticvarianttoken:";

/// One item instance on a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub template_id: String,
    #[serde(default)]
    pub attributes: ItemAttributes,
    #[serde(default)]
    pub quantity: u64,
}

impl Item {
    pub fn new(template_id: impl Into<String>, quantity: u64) -> Self {
        Self {
            template_id: template_id.into(),
            attributes: ItemAttributes::default(),
            quantity,
        }
    }
}

/// Item attributes: the fields this service understands, plus everything
/// else carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemAttributes {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VariantChannel>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ownership state of one cosmetic customisation channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantChannel {
    pub channel: String,
    pub active: String,
    #[serde(default)]
    pub owned: Vec<String>,
}

/// Closed set of item categories, derived from the template id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Currency,
    CosmeticVariantToken,
    Other,
}

impl ItemKind {
    pub fn of(template_id: &str) -> Self {
        let lower = template_id.to_ascii_lowercase();
        if lower.starts_with(VARIANT_TOKEN_PREFIX) {
            ItemKind::CosmeticVariantToken
        } else if template_id.contains(CURRENCY_MARKER) {
            ItemKind::Currency
        } else {
            ItemKind::Other
        }
    }
}

/// A gift waiting to be opened by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftBox {
    pub template_id: String,
    #[serde(default)]
    pub attributes: GiftBoxAttributes,
    #[serde(default = "one")]
    pub quantity: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftBoxAttributes {
    #[serde(default)]
    pub loot_list: Vec<LootEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One line of a gift box or purchase loot result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LootEntry {
    pub item_type: String,
    pub item_guid: String,
    pub quantity: u64,
}

fn one() -> u64 {
    1
}
