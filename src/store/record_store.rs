//! RecordStore - abstract keyed storage for records.

use super::{Record, StoreError, Versioned};

/// Abstract keyed storage for records.
///
/// Implementations must be cheap to clone handles onto the same underlying
/// data; the HTTP layer hands clones to every component.
pub trait RecordStore: Clone + Send + Sync + 'static {
    /// Get a record by key. Returns `None` if not found.
    fn get<R: Record>(&self, key: &str) -> Result<Option<Versioned<R>>, StoreError>;

    /// Insert a new record. Fails with `AlreadyExists` if the key is taken.
    fn insert<R: Record>(&self, record: &R) -> Result<Versioned<R>, StoreError>;

    /// Insert or replace a record, bumping its version.
    fn upsert<R: Record>(&self, record: &R) -> Result<Versioned<R>, StoreError>;

    /// All records of a table matching a predicate, in key order.
    fn find<R: Record>(&self, predicate: &dyn Fn(&R) -> bool)
        -> Result<Vec<Versioned<R>>, StoreError>;
}
