//! Service configuration.
//!
//! Loaded from an optional TOML file, then overridden by `GAMESESSIONS_*`
//! environment variables. Every field has a default, so an empty file (or no
//! file at all) yields a runnable development setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "GAMESESSIONS_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Listen address, e.g. `0.0.0.0:3551`.
    pub bind: String,
    /// Season whose progress entry the reward endpoints mutate.
    pub current_season: u32,
    /// Reported as `originatingService` in error bodies.
    pub originating_service: String,
    /// Game-server clients allowed through basic-token auth. Empty disables
    /// the check.
    pub client_credentials: Vec<ClientCredential>,
    /// JSON season table; the built-in curve is used when unset.
    pub rewards_table: Option<PathBuf>,
    /// Accounts registered (with default profiles) at startup.
    pub accounts: Vec<SeedAccount>,
    /// Where gift notifications go.
    pub notifier: NotifierKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3551".to_string(),
            current_season: 13,
            originating_service: "gamesessions".to_string(),
            client_credentials: Vec::new(),
            rewards_table: None,
            accounts: Vec::new(),
            notifier: NotifierKind::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    /// Log each message through `tracing`.
    #[default]
    Log,
    /// Emit on the in-process event emitter (feature `emitter`).
    Emitter,
}

impl std::str::FromStr for NotifierKind {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(NotifierKind::Log),
            "emitter" => Ok(NotifierKind::Emitter),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredential {
    pub client_id: String,
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedAccount {
    pub account_id: String,
    pub username: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

impl Config {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read `path` if given, then apply the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        config.with_env(std::env::vars())
    }

    /// Apply `GAMESESSIONS_*` overrides from `vars`.
    ///
    /// `CLIENT_ID` and `CLIENT_SECRET` together add one credential.
    pub fn with_env<I>(mut self, vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut client_id = None;
        let mut client_secret = None;

        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match key {
                "BIND" => self.bind = value,
                "CURRENT_SEASON" => {
                    self.current_season =
                        value
                            .trim()
                            .parse()
                            .map_err(|_| ConfigError::InvalidValue {
                                key: name.clone(),
                                value: value.clone(),
                            })?;
                }
                "ORIGINATING_SERVICE" => self.originating_service = value,
                "REWARDS_TABLE" => self.rewards_table = Some(PathBuf::from(value)),
                "NOTIFIER" => {
                    self.notifier = value.parse().map_err(|_| ConfigError::InvalidValue {
                        key: name.clone(),
                        value: value.clone(),
                    })?;
                }
                "CLIENT_ID" => client_id = Some(value),
                "CLIENT_SECRET" => client_secret = Some(value),
                _ => {}
            }
        }

        if let (Some(client_id), Some(secret)) = (client_id, client_secret) {
            self.client_credentials
                .push(ClientCredential { client_id, secret });
        }
        Ok(self)
    }

    pub fn auth_enabled(&self) -> bool {
        !self.client_credentials.is_empty()
    }
}
