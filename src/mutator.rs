//! Profile mutation - applies a resolved [`RewardOutcome`] to the `athena` and
//! `common_core` documents.
//!
//! Grants are applied one at a time, in table order, and everything lands on
//! the in-memory documents before the caller persists anything. The
//! [`MutationReport`] tells the caller which documents changed and whether a
//! gift notification is owed.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;

use crate::profile::{
    GiftBox, GiftBoxAttributes, Item, ItemKind, LootEntry, Profile, ProfileChange, SeasonProgress,
    VariantChannel, BATTLEPASS_GIFT_BOX, DEFAULT_LEVEL, DEFAULT_XP, MTX_CURRENCY,
};
use crate::rewards::{Grant, GrantTarget, RewardOutcome, VariantTokenTable};

/// What one mutation batch did to the two profiles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationReport {
    pub athena_changes: Vec<ProfileChange>,
    pub common_core_changes: Vec<ProfileChange>,
    pub loot: Vec<LootEntry>,
    /// A gift box was dropped; the account is owed exactly one notification.
    pub gift_granted: bool,
}

impl MutationReport {
    pub fn athena_changed(&self) -> bool {
        !self.athena_changes.is_empty()
    }

    pub fn common_core_changed(&self) -> bool {
        !self.common_core_changes.is_empty()
    }
}

pub struct ProfileMutator {
    variants: Arc<dyn VariantTokenTable>,
}

impl ProfileMutator {
    pub fn new(variants: Arc<dyn VariantTokenTable>) -> Self {
        Self { variants }
    }

    /// Credit match currency to `common_core` and record a victory on the
    /// current season entry.
    pub fn apply_match_stats(
        &self,
        athena: &mut Profile,
        common_core: &mut Profile,
        outcome: &RewardOutcome,
    ) -> MutationReport {
        let mut report = MutationReport::default();
        let Some(progress) = &outcome.progress else {
            return report;
        };

        if outcome.currency_delta > 0 {
            report.common_core_changes.push(add_currency(
                common_core,
                MTX_CURRENCY,
                outcome.currency_delta,
            ));
        }
        if outcome.wins_delta > 0 {
            report
                .athena_changes
                .push(write_season(athena, progress.clone()));
        }
        report
    }

    /// Apply a level-up outcome: grants, gift box, then the derived
    /// level/xp attributes stamped with `now`.
    pub fn apply_xp(
        &self,
        athena: &mut Profile,
        common_core: &mut Profile,
        outcome: &RewardOutcome,
        now: DateTime<Utc>,
    ) -> MutationReport {
        let mut report = MutationReport::default();
        let Some(progress) = &outcome.progress else {
            return report;
        };

        let attributes = athena.attributes_mut();
        attributes.level.get_or_insert(DEFAULT_LEVEL);
        attributes.xp.get_or_insert(DEFAULT_XP);

        for grant in &outcome.granted_items {
            self.apply_grant(athena, common_core, grant, &mut report);
            report.loot.push(LootEntry {
                item_type: grant.template_id.clone(),
                item_guid: grant.template_id.clone(),
                quantity: grant.quantity,
            });
        }

        if outcome.can_grant_items {
            let gifts = &mut common_core.attributes_mut().gifts;
            gifts.push(GiftBox {
                template_id: BATTLEPASS_GIFT_BOX.to_string(),
                attributes: GiftBoxAttributes {
                    loot_list: report.loot.clone(),
                    ..GiftBoxAttributes::default()
                },
                quantity: 1,
            });
            report
                .common_core_changes
                .push(ProfileChange::stat("gifts", json!(gifts)));
            report.gift_granted = true;
        }

        report
            .athena_changes
            .push(write_season(athena, progress.clone()));

        let attributes = athena.attributes_mut();
        let account_level = attributes
            .account_level
            .unwrap_or(DEFAULT_LEVEL)
            .saturating_add(outcome.level_delta);
        attributes.level = Some(progress.level());
        attributes.book_level = Some(progress.book_level());
        attributes.xp = Some(progress.xp());
        attributes.account_level = Some(account_level);
        let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        attributes.last_xp_interaction = Some(stamp.clone());

        report.athena_changes.extend([
            ProfileChange::stat("level", progress.level()),
            ProfileChange::stat("book_level", progress.book_level()),
            ProfileChange::stat("xp", progress.xp()),
            ProfileChange::stat("accountLevel", account_level),
            ProfileChange::stat("last_xp_interaction", stamp),
        ]);

        report
    }

    fn apply_grant(
        &self,
        athena: &mut Profile,
        common_core: &mut Profile,
        grant: &Grant,
        report: &mut MutationReport,
    ) {
        match grant.target {
            GrantTarget::Athena => {
                if ItemKind::of(&grant.template_id) == ItemKind::CosmeticVariantToken {
                    if let Some(change) = self.unlock_variant(athena, &grant.template_id) {
                        report.athena_changes.push(change);
                    }
                }
                report.athena_changes.push(upsert_item(athena, grant));
            }
            GrantTarget::CommonCore => {
                let change = if ItemKind::of(&grant.template_id) == ItemKind::Currency {
                    add_currency(common_core, &grant.template_id, grant.quantity)
                } else {
                    upsert_item(common_core, grant)
                };
                report.common_core_changes.push(change);
            }
            GrantTarget::SeasonXpBoost => {
                let boost = &mut athena.attributes_mut().season_match_boost;
                let total = boost.unwrap_or(0).saturating_add(grant.quantity);
                *boost = Some(total);
                report
                    .athena_changes
                    .push(ProfileChange::stat("season_match_boost", total));
            }
            GrantTarget::SeasonFriendXpBoost => {
                let boost = &mut athena.attributes_mut().season_friend_match_boost;
                let total = boost.unwrap_or(0).saturating_add(grant.quantity);
                *boost = Some(total);
                report
                    .athena_changes
                    .push(ProfileChange::stat("season_friend_match_boost", total));
            }
        }
    }

    /// Resolve a variant token and add its style to the target cosmetic.
    ///
    /// Unknown tokens and cosmetics the account does not own are skipped.
    /// Owning the same style twice appends it twice.
    fn unlock_variant(&self, athena: &mut Profile, token: &str) -> Option<ProfileChange> {
        let reward = self.variants.lookup(token)?;
        let item_id = cosmetic_item_id(&reward.template_id);
        let item = athena.items.get_mut(&item_id)?;

        let variants = &mut item.attributes.variants;
        match variants.iter_mut().find(|v| v.channel == reward.channel) {
            Some(existing) => existing.owned.push(reward.value),
            None => variants.push(VariantChannel {
                channel: reward.channel,
                active: reward.value.clone(),
                owned: vec![reward.value],
            }),
        }

        Some(ProfileChange::ItemAttrChanged {
            item_id,
            attribute_name: "variants".to_string(),
            attribute_value: json!(variants),
        })
    }
}

/// Add `quantity` to the first item stacking `template_id`, creating the
/// stack if the profile has none.
pub fn add_currency(profile: &mut Profile, template_id: &str, quantity: u64) -> ProfileChange {
    let existing = profile
        .items
        .iter_mut()
        .find(|(_, item)| item.template_id == template_id);

    match existing {
        Some((item_id, item)) => {
            item.quantity = item.quantity.saturating_add(quantity);
            ProfileChange::ItemQuantityChanged {
                item_id: item_id.clone(),
                quantity: item.quantity,
            }
        }
        None => {
            let item = Item::new(template_id, quantity);
            profile.items.insert(template_id.to_string(), item.clone());
            ProfileChange::ItemAdded {
                item_id: template_id.to_string(),
                item,
            }
        }
    }
}

/// Insert or overwrite the item keyed by the grant's template id.
pub fn upsert_item(profile: &mut Profile, grant: &Grant) -> ProfileChange {
    let item = Item {
        template_id: grant.template_id.clone(),
        attributes: grant.attributes.clone(),
        quantity: grant.quantity,
    };
    profile
        .items
        .insert(grant.template_id.clone(), item.clone());
    ProfileChange::ItemAdded {
        item_id: grant.template_id.clone(),
        item,
    }
}

fn write_season(athena: &mut Profile, progress: SeasonProgress) -> ProfileChange {
    let seasons = &mut athena.attributes_mut().past_seasons;
    match seasons
        .iter_mut()
        .find(|season| season.season_number == progress.season_number)
    {
        Some(entry) => *entry = progress,
        None => seasons.push(progress),
    }
    ProfileChange::stat("past_seasons", json!(seasons))
}

/// Cosmetics are keyed as `Type:lowercase_id`.
fn cosmetic_item_id(template_id: &str) -> String {
    match template_id.split_once(':') {
        Some((kind, id)) => format!("{}:{}", kind, id.to_lowercase()),
        None => template_id.to_string(),
    }
}
