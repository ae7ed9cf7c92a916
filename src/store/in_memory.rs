//! InMemoryRecordStore - BTreeMap-backed record store for development and tests.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::{Record, RecordStore, StoreError, Versioned};

struct StoredRecord {
    document: Value,
    version: u64,
}

/// In-memory record store.
///
/// Storage key is `"TABLE:key"`. Clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryRecordStore {
    storage: Arc<RwLock<BTreeMap<String, StoredRecord>>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn make_key(table: &str, key: &str) -> String {
        format!("{}:{}", table, key)
    }

    fn encode<R: Record>(record: &R) -> Result<Value, StoreError> {
        serde_json::to_value(record).map_err(|e| StoreError::Serde(e.to_string()))
    }

    fn decode<R: Record>(document: &Value) -> Result<R, StoreError> {
        R::deserialize(document).map_err(|e| StoreError::Serde(e.to_string()))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get<R: Record>(&self, key: &str) -> Result<Option<Versioned<R>>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        match storage.get(&Self::make_key(R::TABLE, key)) {
            Some(stored) => Ok(Some(Versioned {
                data: Self::decode(&stored.document)?,
                version: stored.version,
            })),
            None => Ok(None),
        }
    }

    fn insert<R: Record>(&self, record: &R) -> Result<Versioned<R>, StoreError> {
        let key = Self::make_key(R::TABLE, &record.key());
        let document = Self::encode(record)?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        if storage.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                table: R::TABLE.to_string(),
                key: record.key(),
            });
        }

        storage.insert(
            key,
            StoredRecord {
                document,
                version: 1,
            },
        );

        Ok(Versioned {
            data: record.clone(),
            version: 1,
        })
    }

    fn upsert<R: Record>(&self, record: &R) -> Result<Versioned<R>, StoreError> {
        let key = Self::make_key(R::TABLE, &record.key());
        let document = Self::encode(record)?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let version = storage.get(&key).map(|s| s.version + 1).unwrap_or(1);
        storage.insert(key, StoredRecord { document, version });

        Ok(Versioned {
            data: record.clone(),
            version,
        })
    }

    fn find<R: Record>(
        &self,
        predicate: &dyn Fn(&R) -> bool,
    ) -> Result<Vec<Versioned<R>>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let prefix = format!("{}:", R::TABLE);
        let mut results = Vec::new();

        for (_, stored) in storage
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
        {
            let data: R = Self::decode(&stored.document)?;
            if predicate(&data) {
                results.push(Versioned {
                    data,
                    version: stored.version,
                });
            }
        }

        Ok(results)
    }
}
