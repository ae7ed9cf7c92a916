//! Wire shapes for profile mutation responses.
//!
//! Every response carries the revision of the profile value it was built
//! from; the base revision is always one behind.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::profile::{LootEntry, Profile, ProfileChange, ProfileId};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub profile_revision: u64,
    pub profile_id: ProfileId,
    pub profile_changes_base_revision: u64,
    pub profile_changes: Vec<ProfileChange>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<PurchaseNotification>,
    pub profile_command_revision: u64,
    pub server_time: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub multi_update: Vec<ProfileUpdate>,
    pub response_version: u32,
}

/// A secondary profile's changes riding along with the primary response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub profile_revision: u64,
    pub profile_id: ProfileId,
    pub profile_changes_base_revision: u64,
    pub profile_changes: Vec<ProfileChange>,
    pub profile_command_revision: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseNotification {
    #[serde(rename = "type")]
    pub kind: String,
    pub primary: bool,
    pub loot_result: LootResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LootResult {
    pub items: Vec<LootEntry>,
}

pub fn server_time() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Standard response for a single mutated profile.
pub fn generate(profile: &Profile, changes: Vec<ProfileChange>, profile_id: ProfileId) -> ProfileResponse {
    let revision = profile.rvn;
    ProfileResponse {
        profile_revision: revision,
        profile_id,
        profile_changes_base_revision: revision.saturating_sub(1),
        profile_changes: changes,
        notifications: Vec::new(),
        profile_command_revision: revision,
        server_time: server_time(),
        multi_update: Vec::new(),
        response_version: 1,
    }
}

/// Response for a refund: the primary profile plus the athena changes.
pub fn generate_refund_response(
    profile: &Profile,
    athena: &Profile,
    changes: Vec<ProfileChange>,
    athena_changes: Vec<ProfileChange>,
    profile_id: ProfileId,
) -> ProfileResponse {
    ProfileResponse {
        profile_revision: profile.rvn,
        profile_id,
        profile_changes_base_revision: profile.rvn.saturating_sub(1),
        profile_changes: changes,
        notifications: Vec::new(),
        profile_command_revision: profile.command_revision,
        server_time: server_time(),
        multi_update: vec![athena_update(athena, athena_changes)],
        response_version: 1,
    }
}

/// Refund shape plus a `CatalogPurchase` notification listing the loot.
pub fn generate_purchase_response(
    profile: &Profile,
    athena: &Profile,
    changes: Vec<ProfileChange>,
    athena_changes: Vec<ProfileChange>,
    loot: Vec<LootEntry>,
    profile_id: ProfileId,
) -> ProfileResponse {
    let mut response =
        generate_refund_response(profile, athena, changes, athena_changes, profile_id);
    response.notifications.push(PurchaseNotification {
        kind: "CatalogPurchase".to_string(),
        primary: true,
        loot_result: LootResult { items: loot },
    });
    response
}

fn athena_update(athena: &Profile, changes: Vec<ProfileChange>) -> ProfileUpdate {
    ProfileUpdate {
        profile_revision: athena.rvn,
        profile_id: ProfileId::Athena,
        profile_changes_base_revision: athena.rvn.saturating_sub(1),
        profile_changes: changes,
        profile_command_revision: athena.command_revision,
    }
}
