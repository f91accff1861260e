//! Storage port: the key/value text store the onboarding snapshot lives in.

use crate::error::StorageError;

/// Backend-agnostic key/value text store.
///
/// Values are opaque strings; callers own the encoding. Writes to the same
/// key overwrite, last writer wins.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}
