//! Table - typed accessor for one record type.

use std::marker::PhantomData;

use super::{Record, RecordStore, StoreError, Versioned};

/// Typed view of a single table on a [`RecordStore`].
pub struct Table<'a, S, R> {
    store: &'a S,
    _marker: PhantomData<R>,
}

impl<'a, S: RecordStore, R: Record> Table<'a, S, R> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    pub fn get(&self, key: &str) -> Result<Option<Versioned<R>>, StoreError> {
        self.store.get(key)
    }

    pub fn insert(&self, record: &R) -> Result<Versioned<R>, StoreError> {
        self.store.insert(record)
    }

    pub fn upsert(&self, record: &R) -> Result<Versioned<R>, StoreError> {
        self.store.upsert(record)
    }

    pub fn find(&self, predicate: &dyn Fn(&R) -> bool) -> Result<Vec<Versioned<R>>, StoreError> {
        self.store.find(predicate)
    }

    pub fn all(&self) -> Result<Vec<Versioned<R>>, StoreError> {
        self.store.find(&|_| true)
    }
}

/// Extension trait for typed table access on any [`RecordStore`].
pub trait TablesExt: RecordStore {
    fn table<R: Record>(&self) -> Table<'_, Self, R> {
        Table::new(self)
    }
}

impl<S: RecordStore> TablesExt for S {}
