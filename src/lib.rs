pub mod accounts;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod lock;
pub mod mutator;
pub mod notify;
pub mod profile;
pub mod response;
pub mod rewards;
pub mod session;
pub mod store;

pub use accounts::{Account, AccountDirectory};
pub use config::{ClientCredential, Config, ConfigError, NotifierKind, SeedAccount};
pub use error::{ApiError, ErrorBody};
pub use http::{router, serve, AppState};
pub use lock::{AccountLocks, LockError};
pub use mutator::{MutationReport, ProfileMutator};
pub use notify::{LogNotifier, Notifier, NotifyError, PresenceMessage};
#[cfg(feature = "emitter")]
pub use notify::EmitterNotifier;
pub use profile::{Item, ItemKind, Profile, ProfileChange, ProfileId, ProfileStore};
pub use response::{generate, generate_purchase_response, generate_refund_response, ProfileResponse};
pub use rewards::{
    Grant, GrantTarget, RewardOutcome, RewardResolver, SeasonRewardTable, StaticSeasonTable,
    StaticVariantTable, VariantTokenTable,
};
pub use session::{CreateSession, SessionDirectory, SessionError, SessionRecord, SessionStatus};
pub use store::{InMemoryRecordStore, Record, RecordStore, StoreError, TablesExt};

// Re-export the EventEmitter from the event_emitter_rs crate
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
