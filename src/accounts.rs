//! Account lookup by username.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{Record, RecordStore, StoreError, TablesExt};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_id: String,
    pub username: String,
}

impl Account {
    pub fn new(account_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            username: username.into(),
        }
    }
}

impl Record for Account {
    const TABLE: &'static str = "accounts";

    fn key(&self) -> String {
        self.account_id.clone()
    }
}

#[derive(Clone)]
pub struct AccountDirectory<S> {
    store: S,
}

impl<S: RecordStore> AccountDirectory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Insert or replace an account.
    pub fn register(&self, account: &Account) -> Result<(), StoreError> {
        self.store.table::<Account>().upsert(account)?;
        debug!(account_id = %account.account_id, username = %account.username, "account registered");
        Ok(())
    }

    pub fn get(&self, account_id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.store.table::<Account>().get(account_id)?.map(|v| v.data))
    }

    /// Exact, case-sensitive username match.
    pub fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let matches = self
            .store
            .table::<Account>()
            .find(&|account: &Account| account.username == username)?;
        Ok(matches.into_iter().next().map(|v| v.data))
    }
}
