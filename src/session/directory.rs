use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use super::{parse_int, CreateSession, SessionError, SessionRecord, SessionStatus};
use crate::store::{RecordStore, StoreError, TablesExt};

/// Session registry over a [`RecordStore`] with a read-through cache.
///
/// The store is authoritative. Every write goes to the store first and only
/// then drops the cached copy, so a failed write leaves both views intact.
/// Cache fills and writes both run under the cache write lock; a fill can
/// never land after a newer write has invalidated the entry.
#[derive(Clone)]
pub struct SessionDirectory<S> {
    store: S,
    cache: Arc<RwLock<HashMap<String, SessionRecord>>>,
}

impl<S: RecordStore> SessionDirectory<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn create(&self, request: CreateSession) -> Result<SessionRecord, SessionError> {
        let session_id = request
            .session_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| SessionError::Validation("sessionId is required.".into()))?;

        let (Some(version), Some(port)) = (
            parse_int::<u32>(&request.version),
            parse_int::<u16>(&request.port),
        ) else {
            return Err(SessionError::Validation(
                "Version or Port must be valid numbers.".into(),
            ));
        };

        let status = match request.status.as_deref() {
            Some(raw) => raw.parse()?,
            None => SessionStatus::default(),
        };

        let record = SessionRecord {
            session_id,
            status,
            version,
            address: request.address.unwrap_or_default(),
            port,
            identifier: request.identifier.unwrap_or_default(),
            options: request.options,
        };

        let mut cache = self.cache_write()?;
        match self.store.table::<SessionRecord>().insert(&record) {
            Ok(_) => {}
            Err(StoreError::AlreadyExists { key, .. }) => {
                return Err(SessionError::Validation(format!(
                    "Session '{}' already exists.",
                    key
                )));
            }
            Err(err) => return Err(err.into()),
        }
        cache.remove(&record.session_id);
        drop(cache);

        info!(
            session_id = %record.session_id,
            address = %record.address,
            port = record.port,
            "game session registered"
        );
        Ok(record)
    }

    /// All sessions, ordered by session id.
    pub fn list(&self) -> Result<Vec<SessionRecord>, SessionError> {
        let records = self.store.table::<SessionRecord>().all()?;
        Ok(records.into_iter().map(|v| v.data).collect())
    }

    pub fn get_by_session_id(&self, session_id: &str) -> Result<Option<SessionRecord>, SessionError> {
        if let Some(cached) = self.cache_read()?.get(session_id) {
            return Ok(Some(cached.clone()));
        }

        let mut cache = self.cache_write()?;
        if let Some(cached) = cache.get(session_id) {
            return Ok(Some(cached.clone()));
        }
        let Some(stored) = self.store.table::<SessionRecord>().get(session_id)? else {
            return Ok(None);
        };
        cache.insert(session_id.to_string(), stored.data.clone());
        Ok(Some(stored.data))
    }

    pub fn set_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> Result<SessionRecord, SessionError> {
        let mut cache = self.cache_write()?;
        let mut record = self
            .store
            .table::<SessionRecord>()
            .get(session_id)?
            .map(|stored| stored.data)
            .ok_or_else(|| SessionError::NotFound(session_id.to_string()))?;

        record.status = status;
        self.store.table::<SessionRecord>().upsert(&record)?;
        cache.remove(session_id);
        drop(cache);

        debug!(session_id, %status, "game session status changed");
        Ok(record)
    }

    fn cache_read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, SessionRecord>>, SessionError> {
        self.cache
            .read()
            .map_err(|_| StoreError::Storage("session cache poisoned".into()).into())
    }

    fn cache_write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, SessionRecord>>, SessionError> {
        self.cache
            .write()
            .map_err(|_| StoreError::Storage("session cache poisoned".into()).into())
    }
}
