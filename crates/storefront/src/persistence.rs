//! Durable key-value persistence for the cart and favorites.
//!
//! # Architecture
//!
//! - [`KeyValueStore`] is the storage port: string keys to string values
//! - [`MemoryStore`] backs tests and can simulate failing storage
//! - [`FileStore`] keeps one JSON file per key in a data directory
//! - [`PersistenceBridge`] serializes values to JSON, falls back to defaults on
//!   any read problem, and reports every failure to a [`PersistenceObserver`]
//!   instead of returning it
//!
//! Writes are fire-and-forget from the caller's point of view: a failed write
//! leaves the in-memory state untouched and the next successful write
//! overwrites whatever is on disk.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default storage key for the cart line sequence.
pub const CART_KEY: &str = "dessert-cart";

/// Default storage key for the favorites sequence.
pub const FAVORITES_KEY: &str = "dessert-favorites";

/// Errors raised by a storage backend or while (de)serializing values.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot be used at all.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the write because it is full.
    #[error("storage quota exceeded while writing {key}")]
    QuotaExceeded { key: String },

    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Filesystem error.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored value is not valid JSON for the expected type, or the value
    /// could not be serialized.
    #[error("malformed stored value: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A string-keyed, string-valued durable store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// In-memory store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes once the total stored size would exceed
    /// `quota_bytes` (keys plus values).
    #[must_use]
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            inner: Arc::new(MemoryStoreInner {
                quota_bytes: Some(quota_bytes),
                ..MemoryStoreInner::default()
            }),
        }
    }

    /// Make every read fail with [`StorageError::Unavailable`].
    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write fail with [`StorageError::Unavailable`].
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delete a key, returning the previous value.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries().remove(key)
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.inner
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("writes disabled".to_string()));
        }

        let mut entries = self.entries();
        if let Some(quota) = self.inner.quota_bytes {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// One `<key>.json` file per key inside a directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write never leaves a truncated value behind. Temporary files
/// carry the process id, so concurrent processes sharing a directory never
/// write into each other's temporary file.
///
/// All I/O is blocking `std::fs`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Use `dir` as the data directory. It is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn tmp_path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{key}.json.{}.tmp", std::process::id()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let tmp = self.tmp_path_for(key);
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

// =============================================================================
// Failure Reporting
// =============================================================================

/// Which persistence step failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceOp {
    Load,
    Save,
}

impl fmt::Display for PersistenceOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load => write!(f, "load"),
            Self::Save => write!(f, "save"),
        }
    }
}

/// A persistence failure handed to the observer.
#[derive(Debug)]
pub struct PersistenceFailure<'a> {
    pub op: PersistenceOp,
    pub key: &'a str,
    pub error: &'a StorageError,
}

/// Receives persistence failures. Never sees successful operations.
pub trait PersistenceObserver: Send + Sync {
    fn report(&self, failure: &PersistenceFailure<'_>);
}

/// Logs failures as `tracing` warnings.
///
/// When the binary installs the Sentry tracing layer, these warnings become
/// Sentry events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl PersistenceObserver for TracingObserver {
    fn report(&self, failure: &PersistenceFailure<'_>) {
        tracing::warn!(
            op = %failure.op,
            key = failure.key,
            error = %failure.error,
            "Persistence failed, continuing with in-memory state"
        );
    }
}

// =============================================================================
// Bridge
// =============================================================================

/// Generic load-on-start / save-on-change adapter over a [`KeyValueStore`].
///
/// Cheaply cloneable; clones share the store and the observer.
#[derive(Clone)]
pub struct PersistenceBridge {
    store: Arc<dyn KeyValueStore>,
    observer: Arc<dyn PersistenceObserver>,
}

impl PersistenceBridge {
    /// Bridge over `store`, reporting failures to [`TracingObserver`].
    #[must_use]
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self::from_parts(Arc::new(store), Arc::new(TracingObserver))
    }

    #[must_use]
    pub fn from_parts(
        store: Arc<dyn KeyValueStore>,
        observer: Arc<dyn PersistenceObserver>,
    ) -> Self {
        Self { store, observer }
    }

    /// Replace the failure observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn PersistenceObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Read and decode the value under `key`.
    ///
    /// Returns `T::default()` when the key is absent, the store cannot be
    /// read, or the stored JSON does not decode; the last two are reported.
    pub fn load<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.try_load(key) {
            Ok(value) => value.unwrap_or_default(),
            Err(error) => {
                self.report(PersistenceOp::Load, key, &error);
                T::default()
            }
        }
    }

    /// Encode and write `value` under `key`. Failures are reported, not
    /// returned.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set(key, &json));
        if let Err(error) = result {
            self.report(PersistenceOp::Save, key, &error);
        }
    }

    fn try_load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        self.store
            .get(key)?
            .map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(StorageError::from)
    }

    fn report(&self, op: PersistenceOp, key: &str, error: &StorageError) {
        self.observer
            .report(&PersistenceFailure { op, key, error });
    }
}

impl fmt::Debug for PersistenceBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceBridge").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Observer that records every failure for assertions.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingObserver {
        pub(crate) failures: Mutex<Vec<(PersistenceOp, String, String)>>,
    }

    impl RecordingObserver {
        pub(crate) fn ops(&self) -> Vec<PersistenceOp> {
            self.failures.lock().unwrap().iter().map(|f| f.0).collect()
        }
    }

    impl PersistenceObserver for RecordingObserver {
        fn report(&self, failure: &PersistenceFailure<'_>) {
            self.failures.lock().unwrap().push((
                failure.op,
                failure.key.to_string(),
                failure.error.to_string(),
            ));
        }
    }

    fn bridge(store: &MemoryStore) -> (PersistenceBridge, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::default());
        let bridge = PersistenceBridge::new(store.clone()).with_observer(observer.clone());
        (bridge, observer)
    }

    #[test]
    fn test_load_absent_key_is_default_without_report() {
        let store = MemoryStore::new();
        let (bridge, observer) = bridge(&store);
        let value: Vec<String> = bridge.load("missing");
        assert!(value.is_empty());
        assert!(observer.ops().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let (bridge, observer) = bridge(&store);
        bridge.save("names", &vec!["a".to_string(), "b".to_string()]);

        let value: Vec<String> = bridge.load("names");
        assert_eq!(value, vec!["a", "b"]);
        assert_eq!(store.get("names").unwrap().as_deref(), Some(r#"["a","b"]"#));
        assert!(observer.ops().is_empty());
    }

    #[test]
    fn test_malformed_value_falls_back_and_reports() {
        let store = MemoryStore::new();
        store.set("names", "not json").unwrap();
        let (bridge, observer) = bridge(&store);

        let value: Vec<String> = bridge.load("names");
        assert!(value.is_empty());
        assert_eq!(observer.ops(), vec![PersistenceOp::Load]);
    }

    #[test]
    fn test_unreadable_store_falls_back_and_reports() {
        let store = MemoryStore::new();
        store.set("names", r#"["a"]"#).unwrap();
        store.fail_reads(true);
        let (bridge, observer) = bridge(&store);

        let value: Vec<String> = bridge.load("names");
        assert!(value.is_empty());
        assert_eq!(observer.ops(), vec![PersistenceOp::Load]);
    }

    #[test]
    fn test_quota_exceeded_is_reported() {
        let store = MemoryStore::with_quota(16);
        let (bridge, observer) = bridge(&store);

        bridge.save("k", &"short");
        assert!(observer.ops().is_empty());

        bridge.save("k", &"a value that is far too long");
        assert_eq!(observer.ops(), vec![PersistenceOp::Save]);
        let failures = observer.failures.lock().unwrap();
        assert!(failures[0].2.contains("quota exceeded"));
        drop(failures);

        // The previous value is untouched.
        assert_eq!(store.get("k").unwrap().as_deref(), Some("\"short\""));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data"));

        assert_eq!(store.get("dessert-cart").unwrap(), None);
        store.set("dessert-cart", "[1,2]").unwrap();
        assert_eq!(store.get("dessert-cart").unwrap().as_deref(), Some("[1,2]"));

        store.set("dessert-cart", "[]").unwrap();
        assert_eq!(store.get("dessert-cart").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data/dessert-cart.json").exists());
    }

    #[test]
    fn test_file_store_temp_files_are_per_process() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        let tmp = store.tmp_path_for("dessert-cart");
        let tmp_name = tmp.file_name().unwrap().to_str().unwrap();
        assert!(tmp_name.contains(&std::process::id().to_string()));

        // A half-written file from another process is left alone.
        let other = dir.path().join(".dessert-cart.json.0.tmp");
        std::fs::write(&other, "[garbage").unwrap();
        store.set("dessert-cart", "[1]").unwrap();

        assert_eq!(store.get("dessert-cart").unwrap().as_deref(), Some("[1]"));
        assert_eq!(std::fs::read_to_string(&other).unwrap(), "[garbage");
        assert!(!tmp.exists());
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(matches!(store.get(key), Err(StorageError::InvalidKey(_))));
            assert!(matches!(store.set(key, "x"), Err(StorageError::InvalidKey(_))));
        }
    }

    #[test]
    fn test_file_store_unwritable_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "a file, not a directory").unwrap();

        let observer = Arc::new(RecordingObserver::default());
        let bridge = PersistenceBridge::new(FileStore::new(blocker.join("data")))
            .with_observer(observer.clone());
        bridge.save(CART_KEY, &Vec::<String>::new());
        assert_eq!(observer.ops(), vec![PersistenceOp::Save]);
    }
}
