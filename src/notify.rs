//! Out-of-band presence messages to connected clients.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::config::{Config, NotifierKind};

pub const GIFT_RECEIVED: &str = "com.epicgames.gift.received";

/// Message pushed over the presence channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Value,
    pub timestamp: String,
}

impl PresenceMessage {
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
            timestamp: crate::response::server_time(),
        }
    }

    pub fn gift_received() -> Self {
        Self::new(GIFT_RECEIVED, json!({}))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("notifier buffer poisoned")]
    BufferPoisoned,
    #[error("notification encoding failed: {0}")]
    Encode(String),
}

/// Delivers presence messages to a single account.
pub trait Notifier: Send + Sync {
    fn notify(&self, account_id: &str, message: &PresenceMessage) -> Result<(), NotifyError>;
}

/// Writes messages to the log, or to a shared buffer when one is given.
#[derive(Default)]
pub struct LogNotifier {
    buffer: Option<Arc<Mutex<Vec<(String, PresenceMessage)>>>>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<(String, PresenceMessage)>>>) -> Self {
        Self {
            buffer: Some(buffer),
        }
    }
}

impl Notifier for LogNotifier {
    fn notify(&self, account_id: &str, message: &PresenceMessage) -> Result<(), NotifyError> {
        match &self.buffer {
            Some(buffer) => buffer
                .lock()
                .map_err(|_| NotifyError::BufferPoisoned)?
                .push((account_id.to_string(), message.clone())),
            None => info!(account_id, kind = %message.kind, "presence message"),
        }
        Ok(())
    }
}

/// Notifier selected by `config.notifier`.
///
/// The emitter variant bridges every seeded account's event back into the
/// log, so messages stay visible without an external presence service.
pub fn from_config(config: &Config) -> Arc<dyn Notifier> {
    match config.notifier {
        NotifierKind::Log => Arc::new(LogNotifier::new()),
        #[cfg(feature = "emitter")]
        NotifierKind::Emitter => {
            let accounts = config.accounts.iter().map(|seed| seed.account_id.as_str());
            Arc::new(EmitterNotifier::logging_bridge(accounts))
        }
        #[cfg(not(feature = "emitter"))]
        NotifierKind::Emitter => {
            tracing::warn!("built without the emitter feature; falling back to the log notifier");
            Arc::new(LogNotifier::new())
        }
    }
}

#[cfg(feature = "emitter")]
pub use emitter::EmitterNotifier;

#[cfg(feature = "emitter")]
mod emitter {
    use std::sync::Mutex;

    use event_emitter_rs::EventEmitter;
    use tracing::info;

    use super::{Notifier, NotifyError, PresenceMessage};

    /// Emits each message as JSON on the `notify:{accountId}` event, for
    /// in-process presence bridges.
    pub struct EmitterNotifier {
        emitter: Mutex<EventEmitter>,
    }

    impl EmitterNotifier {
        pub fn new(emitter: EventEmitter) -> Self {
            Self {
                emitter: Mutex::new(emitter),
            }
        }

        /// Emitter with one listener per account that logs what it receives.
        pub fn logging_bridge<'a>(account_ids: impl IntoIterator<Item = &'a str>) -> Self {
            let mut emitter = EventEmitter::new();
            for account_id in account_ids {
                let owner = account_id.to_string();
                emitter.on(&Self::event_name(account_id), move |raw: String| {
                    info!(account_id = %owner, message = %raw, "presence message");
                });
            }
            Self::new(emitter)
        }

        pub fn event_name(account_id: &str) -> String {
            format!("notify:{}", account_id)
        }
    }

    impl Notifier for EmitterNotifier {
        fn notify(&self, account_id: &str, message: &PresenceMessage) -> Result<(), NotifyError> {
            let encoded =
                serde_json::to_string(message).map_err(|e| NotifyError::Encode(e.to_string()))?;
            self.emitter
                .lock()
                .map_err(|_| NotifyError::BufferPoisoned)?
                .emit(&Self::event_name(account_id), encoded);
            Ok(())
        }
    }
}
