use std::sync::Arc;

use axum::http::Uri;

use crate::accounts::AccountDirectory;
use crate::config::Config;
use crate::error::{ApiError, ErrorResponse};
use crate::lock::AccountLocks;
use crate::mutator::ProfileMutator;
use crate::notify::{LogNotifier, Notifier};
use crate::profile::ProfileStore;
use crate::response::server_time;
use crate::rewards::{
    RewardResolver, SeasonRewardTable, StaticSeasonTable, StaticVariantTable, VariantTokenTable,
};
use crate::session::SessionDirectory;
use crate::store::RecordStore;

/// Everything the handlers share. All components sit on one record store.
pub struct AppState<S> {
    pub config: Config,
    pub sessions: SessionDirectory<S>,
    pub profiles: ProfileStore<S>,
    pub accounts: AccountDirectory<S>,
    pub resolver: RewardResolver,
    pub mutator: ProfileMutator,
    pub notifier: Arc<dyn Notifier>,
    pub locks: AccountLocks,
}

impl<S: RecordStore> AppState<S> {
    /// State with the built-in reward tables and a logging notifier.
    pub fn new(config: Config, store: S) -> Self {
        let resolver = RewardResolver::new(
            config.current_season,
            Arc::new(StaticSeasonTable::builtin()),
        );
        Self {
            sessions: SessionDirectory::new(store.clone()),
            profiles: ProfileStore::new(store.clone()),
            accounts: AccountDirectory::new(store),
            resolver,
            mutator: ProfileMutator::new(Arc::new(StaticVariantTable::builtin())),
            notifier: Arc::new(LogNotifier::new()),
            locks: AccountLocks::new(),
            config,
        }
    }

    pub fn with_season_table(mut self, table: Arc<dyn SeasonRewardTable>) -> Self {
        self.resolver = RewardResolver::new(self.config.current_season, table);
        self
    }

    pub fn with_variant_table(mut self, table: Arc<dyn VariantTokenTable>) -> Self {
        self.mutator = ProfileMutator::new(table);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Render `err` for a request to `uri`.
    pub fn reject(&self, uri: &Uri, err: &ApiError) -> ErrorResponse {
        ErrorResponse::new(
            err,
            &uri.to_string(),
            &server_time(),
            &self.config.originating_service,
        )
    }
}
