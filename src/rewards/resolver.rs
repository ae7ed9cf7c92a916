use std::sync::Arc;

use super::{RewardOutcome, SeasonRewardTable};
use crate::profile::SeasonProgress;

/// Currency per elimination.
pub const ELIMINATION_REWARD: u64 = 50;
/// Flat currency bonus for a victory.
pub const VICTORY_REWARD: u64 = 200;

pub fn match_currency(eliminations: u32, is_victory: bool) -> u64 {
    let bonus = if is_victory { VICTORY_REWARD } else { 0 };
    u64::from(eliminations) * ELIMINATION_REWARD + bonus
}

/// Resolves progression events against the configured current season.
#[derive(Clone)]
pub struct RewardResolver {
    current_season: u32,
    table: Arc<dyn SeasonRewardTable>,
}

impl RewardResolver {
    pub fn new(current_season: u32, table: Arc<dyn SeasonRewardTable>) -> Self {
        Self {
            current_season,
            table,
        }
    }

    fn current<'a>(&self, seasons: &'a [SeasonProgress]) -> Option<&'a SeasonProgress> {
        seasons
            .iter()
            .find(|season| season.season_number == self.current_season)
    }

    /// Currency and win bookkeeping for one finished match.
    pub fn resolve_match_stats(
        &self,
        seasons: &[SeasonProgress],
        eliminations: u32,
        is_victory: bool,
    ) -> RewardOutcome {
        let Some(season) = self.current(seasons) else {
            return RewardOutcome::default();
        };

        let wins_delta = u32::from(is_victory);
        let mut progress = season.normalized();
        progress.num_wins = progress.num_wins.saturating_add(wins_delta);

        RewardOutcome {
            currency_delta: match_currency(eliminations, is_victory),
            wins_delta,
            progress: Some(progress),
            ..RewardOutcome::default()
        }
    }

    /// Add season XP and level up as far as it reaches, collecting the
    /// rewards of every level passed.
    pub fn resolve_xp(&self, seasons: &[SeasonProgress], total_xp: u64) -> RewardOutcome {
        let Some(season) = self.current(seasons) else {
            return RewardOutcome::default();
        };

        let mut progress = season.normalized();
        let start_level = progress.level();
        let start_book_level = progress.book_level();

        let mut xp = progress
            .xp()
            .saturating_add(i64::try_from(total_xp).unwrap_or(i64::MAX));
        let mut level = start_level;
        let mut book_level = start_book_level;
        let mut granted_items = Vec::new();

        while let Some(cost) = self.table.xp_to_next(level) {
            let cost = i64::try_from(cost).unwrap_or(i64::MAX);
            if xp < cost {
                break;
            }
            xp -= cost;
            level = level.saturating_add(1);
            book_level = book_level.saturating_add(1);
            granted_items.extend(self.table.rewards_at(level, progress.purchased_vip));
        }

        progress.season_xp = Some(xp);
        progress.season_level = Some(level);
        progress.book_level = Some(book_level);

        RewardOutcome {
            xp_delta: total_xp,
            level_delta: level.saturating_sub(start_level),
            book_level_delta: book_level.saturating_sub(start_book_level),
            can_grant_items: !granted_items.is_empty(),
            granted_items,
            progress: Some(progress),
            ..RewardOutcome::default()
        }
    }
}
