//! Key-value persistence shared by the site widgets.
//!
//! Mirrors browser local storage: string keys, string values, synchronous
//! calls. Each widget owns exactly one key; see the `*_KEY` constants.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Consent preferences ([`crate::ConsentRecord`] as JSON).
pub const CONSENT_KEY: &str = "netfyber_cookies";
/// Last resolved location ([`crate::LocationRecord`] as JSON).
pub const LOCATION_KEY: &str = "netfyber_location";
/// Set to [`DENIED_SENTINEL`] once the visitor refuses location access.
pub const LOCATION_DENIED_KEY: &str = "location_permission_denied";
pub const DENIED_SENTINEL: &str = "true";

#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is disabled or inaccessible (private mode, blocked cookies).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded while writing {key}")]
    QuotaExceeded { key: String },

    #[error("JSON error for {key}: {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Synchronous string key-value store.
pub trait KeyValueStore {
    /// Reads `key`; `Ok(None)` when it was never written.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing store rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Reads and deserializes the JSON value stored under `key`.
///
/// # Errors
///
/// Propagates read failures and returns [`StorageError::Serialization`] if
/// the stored text is not valid JSON for `T`.
pub fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Serialization {
            key: key.to_owned(),
            source,
        })
}

/// Serializes `value` as JSON and stores it under `key`.
///
/// # Errors
///
/// Returns [`StorageError::Serialization`] if `value` cannot be encoded, or
/// any error from the underlying write.
pub fn write_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialization {
        key: key.to_owned(),
        source,
    })?;
    store.set(key, &raw)
}

/// In-process store backed by a `BTreeMap`.
///
/// Used by headless hosts and tests. `fail_reads` / `fail_writes` simulate
/// disabled storage and a full quota.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every read returns [`StorageError::Unavailable`].
    #[must_use]
    pub fn with_failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Every write returns [`StorageError::QuotaExceeded`].
    #[must_use]
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn set_failing_writes(&mut self, failing: bool) {
        self.fail_writes = failing;
    }

    /// Raw stored value, bypassing the failure switches.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Unavailable("reads disabled".to_owned()));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QuotaExceeded {
                key: key.to_owned(),
            });
        }
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
