//! Configuration types.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{self, ConfigError};
use crate::onboarding::AgentStore;
use crate::store::FileStore;

/// Environment variable naming the directory that holds stored snapshots.
pub const DATA_DIR_ENV: &str = "AGENT_ONBOARDING_DATA_DIR";
/// Environment variable toggling persistence (`false` runs without a backend).
pub const PERSIST_ENV: &str = "AGENT_ONBOARDING_PERSIST";

/// Host configuration for the onboarding binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingConfig {
    /// Directory used by the file-backed store.
    pub data_dir: PathBuf,
    /// Whether a storage backend is attached at all.
    pub persist: bool,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            persist: true,
        }
    }
}

impl OnboardingConfig {
    /// Build the config from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup(PERSIST_ENV) {
            config.persist = parse_bool(PERSIST_ENV, &raw)?;
        }

        Ok(config)
    }

    /// Build the agent store this config describes: file-backed under
    /// `data_dir`, or detached when persistence is off.
    pub fn build_store(&self) -> error::Result<AgentStore> {
        if !self.persist {
            return Ok(AgentStore::detached());
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: DATA_DIR_ENV.to_string(),
                message: "must not be empty when persistence is on".to_string(),
            }
            .into());
        }
        let backend = FileStore::open(self.data_dir.clone())?;
        Ok(AgentStore::new(Arc::new(backend)))
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}
