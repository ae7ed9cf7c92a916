//! Per-account locks serialising profile mutations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
    #[error("lock registry poisoned")]
    Poisoned,
}

/// Lazily creates one async mutex per account id and hands out owned guards.
///
/// The registry map is only held while looking up the entry, never across an
/// `.await`.
#[derive(Clone, Default)]
pub struct AccountLocks {
    locks: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_lock(&self, account_id: &str) -> Result<Arc<AsyncMutex<()>>, LockError> {
        let mut locks = self.locks.lock().map_err(|_| LockError::Poisoned)?;
        Ok(locks
            .entry(account_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone())
    }

    /// Wait for exclusive access to `account_id`. Released on drop.
    pub async fn acquire(&self, account_id: &str) -> Result<OwnedMutexGuard<()>, LockError> {
        let lock = self.get_lock(account_id)?;
        Ok(lock.lock_owned().await)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }
}
