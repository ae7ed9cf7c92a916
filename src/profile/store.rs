use tracing::debug;

use crate::store::{Record, RecordStore, StoreError, TablesExt};

use super::{Profile, ProfileId};

/// Loads and persists profile documents on a [`RecordStore`].
#[derive(Clone)]
pub struct ProfileStore<S> {
    store: S,
}

impl<S: RecordStore> ProfileStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load(
        &self,
        account_id: &str,
        profile_id: ProfileId,
    ) -> Result<Option<Profile>, StoreError> {
        let key = Profile::store_key(account_id, profile_id);
        Ok(self.store.table::<Profile>().get(&key)?.map(|v| v.data))
    }

    /// Persist one mutation batch.
    ///
    /// Bumps `rvn` and `commandRevision` by one before writing. If the write
    /// fails the revisions are rolled back so the caller's copy still matches
    /// what is stored.
    pub fn persist(&self, profile: &mut Profile) -> Result<(), StoreError> {
        let (rvn, command_revision) = (profile.rvn, profile.command_revision);
        profile.rvn += 1;
        profile.command_revision += 1;

        if let Err(err) = self.store.table::<Profile>().upsert(profile) {
            profile.rvn = rvn;
            profile.command_revision = command_revision;
            return Err(err);
        }

        debug!(
            account_id = %profile.account_id,
            profile_id = %profile.profile_id,
            rvn = profile.rvn,
            "profile persisted"
        );
        Ok(())
    }

    /// Create the `athena` and `common_core` documents an account needs,
    /// leaving existing ones alone.
    pub fn ensure_defaults(&self, account_id: &str, season: u32) -> Result<(), StoreError> {
        let table = self.store.table::<Profile>();
        for profile in [
            Profile::athena(account_id, season),
            Profile::common_core(account_id),
        ] {
            if table.get(&profile.key())?.is_none() {
                table.insert(&profile)?;
            }
        }
        Ok(())
    }
}
