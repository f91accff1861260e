//! Agent snapshot persistence: one record in one fixed storage slot.
//!
//! Backend problems never reach the caller: a missing backend, an I/O
//! failure or an unreadable snapshot all read as "no record" (or a skipped
//! write) and are logged.

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::store::KeyValueStore;

use super::model::AgentRecord;

/// Storage keys used for onboarding persistence.
pub mod storage_keys {
    /// Key for the AgentRecord JSON snapshot.
    pub const AGENT_DATA: &str = "agentData";
}

/// Saves, loads and clears the agent snapshot through an optional backend.
#[derive(Clone)]
pub struct AgentStore {
    backend: Option<Arc<dyn KeyValueStore>>,
}

impl AgentStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A store with no backend: `save` still stamps, nothing is persisted.
    pub fn detached() -> Self {
        Self { backend: None }
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Stamp `completedAt` with the current time and persist the result.
    pub fn save(&self, record: &AgentRecord) -> AgentRecord {
        self.save_at(record, Utc::now())
    }

    /// Stamp `completedAt` with `now` (truncated to milliseconds, the stored
    /// precision) and persist the result. Returns the stamped copy whether or
    /// not it was written.
    pub fn save_at(&self, record: &AgentRecord, now: DateTime<Utc>) -> AgentRecord {
        let mut stamped = record.clone();
        stamped.stamp(now.trunc_subsecs(3));

        let Some(backend) = &self.backend else {
            debug!("No storage backend, agent snapshot not persisted");
            return stamped;
        };

        match write_snapshot(backend.as_ref(), &stamped) {
            Ok(()) => info!(
                callsign = stamped.callsign.as_deref().unwrap_or(""),
                "Agent snapshot saved"
            ),
            Err(e) => warn!(error = %e, "Failed to persist agent snapshot"),
        }
        stamped
    }

    /// The stored snapshot, or `None` if there is none (or no backend).
    pub fn load(&self) -> Option<AgentRecord> {
        let backend = self.backend.as_ref()?;

        match read_snapshot(backend.as_ref()) {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                debug!("No agent snapshot stored");
                None
            }
            Err(e @ StorageError::Serialization(_)) => {
                warn!(error = %e, "Stored agent snapshot is unreadable, ignoring");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to read agent snapshot");
                None
            }
        }
    }

    /// Remove the stored snapshot. No-op without a backend.
    pub fn clear(&self) {
        let Some(backend) = &self.backend else {
            return;
        };
        match backend.remove(storage_keys::AGENT_DATA) {
            Ok(removed) => info!(removed, "Agent snapshot cleared"),
            Err(e) => warn!(error = %e, "Failed to clear agent snapshot"),
        }
    }
}

fn write_snapshot(backend: &dyn KeyValueStore, record: &AgentRecord) -> Result<(), StorageError> {
    let payload = serde_json::to_string(record)?;
    backend.set(storage_keys::AGENT_DATA, &payload)
}

/// A stored snapshot that is not a JSON object is a `Serialization` error.
fn read_snapshot(backend: &dyn KeyValueStore) -> Result<Option<AgentRecord>, StorageError> {
    match backend.get(storage_keys::AGENT_DATA)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

impl std::fmt::Debug for AgentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentStore")
            .field("has_backend", &self.has_backend())
            .finish()
    }
}
