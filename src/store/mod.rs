//! Records - keyed JSON documents behind a swappable store.
//!
//! Everything this service persists (profiles, game sessions, accounts) is a
//! [`Record`]: a serde type with a table name and a key. A [`RecordStore`] is
//! the single source of truth for those documents; the in-memory store ships
//! for development and tests, and a database-backed store plugs in behind the
//! same trait.
//!
//! ## Example
//!
//! ```ignore
//! use gamesessions::store::{InMemoryRecordStore, Record, TablesExt};
//!
//! #[derive(Serialize, Deserialize, Clone)]
//! struct Lobby {
//!     pub id: String,
//!     pub players: u32,
//! }
//!
//! impl Record for Lobby {
//!     const TABLE: &'static str = "lobbies";
//!     fn key(&self) -> String { self.id.clone() }
//! }
//!
//! let store = InMemoryRecordStore::new();
//! store.table::<Lobby>().upsert(&lobby)?;
//! let loaded = store.table::<Lobby>().get("lobby-1")?;
//! ```

mod in_memory;
mod record_store;
mod table;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be stored as records.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The table this record type lives in (e.g. "profiles", "game_sessions").
    const TABLE: &'static str;

    /// Returns the unique key of this record within its table.
    fn key(&self) -> String;
}

/// A record together with the store-assigned version it was read or written at.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Error type for record store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Insert of a key that is already taken.
    #[error("record already exists: {table}:{key}")]
    AlreadyExists { table: String, key: String },
    /// Serialization/deserialization error.
    #[error("record serialization error: {0}")]
    Serde(String),
    /// Storage-level error (lock poisoned, backend unavailable, ...).
    #[error("record storage error: {0}")]
    Storage(String),
}

pub use in_memory::InMemoryRecordStore;
pub use record_store::RecordStore;
pub use table::{Table, TablesExt};
