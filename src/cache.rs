//! Forecast cache over an atomic key-value store with TTL
//!
//! The store holds one collection (`forecast`) with a field per coordinate.
//! Writes are set-if-absent: the first forecast cached for a coordinate
//! stays until it expires, later writers are no-ops.

use async_trait::async_trait;
use fjall::Keyspace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::error::StoreError;
use crate::models::{Coordinate, Forecast};

/// Name of the collection forecasts live in
pub const COLLECTION: &str = "forecast";

/// Atomic key-value store with per-entry expiration
#[async_trait]
pub trait ForecastStore: Send + Sync {
    /// Raw value stored under `field`. Missing and expired fields are `None`.
    async fn get(&self, field: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `value` under `field` with an expiration of `ttl_seconds`,
    /// unless a live value is already there. Value and expiration land
    /// together or not at all. Returns whether the write happened.
    async fn set_if_absent(
        &self,
        field: &str,
        value: Vec<u8>,
        ttl_seconds: u64,
    ) -> Result<bool, StoreError>;
}

#[derive(Serialize, Deserialize)]
struct StoredEntry {
    payload: Vec<u8>,
    expires_at: u64, // Unix timestamp (seconds)
}

impl StoredEntry {
    fn is_live(&self, now: u64) -> bool {
        now < self.expires_at
    }
}

fn unix_now() -> Result<u64, StoreError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| StoreError::backend(format!("system clock before unix epoch: {e}")))
}

fn get_from_store(store: &Keyspace, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
    Ok(store
        .get(key)
        .map_err(|e| StoreError::backend(e.to_string()))?
        .map(|v| v.to_vec()))
}

/// Durable store backed by an embedded fjall database
pub struct FjallStore {
    store: Keyspace,
    // serializes check-then-insert; fjall allows a single process per directory
    write_lock: Arc<Mutex<()>>,
}

impl FjallStore {
    /// Opens (or creates) the database at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = fjall::Database::builder(&path)
            .open()
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        let items = db
            .keyspace(COLLECTION, fjall::KeyspaceCreateOptions::default)
            .map_err(|e| StoreError::unavailable(e.to_string()))?;
        info!(path = %path.as_ref().display(), "opened forecast store");
        Ok(Self {
            store: items,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Deletes `field` if its record is still expired once the write lock
    /// is held; a fresh record written in the meantime is kept.
    async fn remove_expired(&self, field: &str) -> Result<(), StoreError> {
        let store = self.store.clone();
        let lock = Arc::clone(&self.write_lock);
        let key = field.as_bytes().to_vec();

        task::spawn_blocking(move || -> Result<(), StoreError> {
            let _guard = lock
                .lock()
                .map_err(|_| StoreError::backend("forecast store write lock poisoned"))?;
            let Some(bytes) = get_from_store(&store, &key)? else {
                return Ok(());
            };
            let entry: StoredEntry = postcard::from_bytes(&bytes)?;
            if !entry.is_live(unix_now()?) {
                store
                    .remove(key)
                    .map_err(|e| StoreError::backend(e.to_string()))?;
                debug!("Removed expired key");
            }
            Ok(())
        })
        .await?
    }
}

#[async_trait]
impl ForecastStore for FjallStore {
    #[tracing::instrument(name = "query_store", level = "debug", skip(self))]
    async fn get(&self, field: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let store = self.store.clone();
        let key = field.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || get_from_store(&store, &key)).await??;

        let Some(bytes) = maybe_bytes else {
            debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry = postcard::from_bytes(&bytes)?;
        if entry.is_live(unix_now()?) {
            debug!("Key found and still fresh");
            Ok(Some(entry.payload))
        } else {
            debug!("Key found but expired");
            self.remove_expired(field).await?;
            Ok(None)
        }
    }

    #[tracing::instrument(name = "put_store", level = "debug", skip(self, value))]
    async fn set_if_absent(
        &self,
        field: &str,
        value: Vec<u8>,
        ttl_seconds: u64,
    ) -> Result<bool, StoreError> {
        let store = self.store.clone();
        let lock = Arc::clone(&self.write_lock);
        let key = field.as_bytes().to_vec();

        task::spawn_blocking(move || -> Result<bool, StoreError> {
            let _guard = lock
                .lock()
                .map_err(|_| StoreError::backend("forecast store write lock poisoned"))?;
            let now = unix_now()?;

            if let Some(existing) = get_from_store(&store, &key)? {
                match postcard::from_bytes::<StoredEntry>(&existing) {
                    Ok(entry) if entry.is_live(now) => return Ok(false),
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "overwriting corrupt store entry"),
                }
            }

            let entry = StoredEntry {
                payload: value,
                expires_at: now.saturating_add(ttl_seconds),
            };
            let bytes = postcard::to_stdvec(&entry)?;
            store
                .insert(key, bytes)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            Ok(true)
        })
        .await?
    }
}

struct MemoryEntry {
    payload: Vec<u8>,
    expires_at: Instant,
}

/// In-process store; used when no durable store is configured and in tests
#[derive(Default)]
pub struct MemoryStore {
    entries: tokio::sync::Mutex<HashMap<String, MemoryEntry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ForecastStore for MemoryStore {
    async fn get(&self, field: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut entries = self.entries.lock().await;
        match entries.get(field) {
            Some(entry) if Instant::now() < entry.expires_at => Ok(Some(entry.payload.clone())),
            Some(_) => {
                entries.remove(field);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_if_absent(
        &self,
        field: &str,
        value: Vec<u8>,
        ttl_seconds: u64,
    ) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        if entries.get(field).is_some_and(|entry| now < entry.expires_at) {
            return Ok(false);
        }
        entries.insert(
            field.to_string(),
            MemoryEntry {
                payload: value,
                expires_at: now + Duration::from_secs(ttl_seconds),
            },
        );
        Ok(true)
    }
}

/// Opens the store selected by the cache configuration
pub fn open_store(config: &CacheConfig) -> Result<Arc<dyn ForecastStore>, StoreError> {
    match config.backend.as_str() {
        "memory" => {
            info!("using in-memory forecast store");
            Ok(Arc::new(MemoryStore::new()))
        }
        _ => Ok(Arc::new(FjallStore::open(config.store_path())?)),
    }
}

/// Forecast cache keyed by coordinate; owns serialization and TTL
pub struct ForecastCache {
    store: Arc<dyn ForecastStore>,
    ttl_seconds: u64,
}

impl ForecastCache {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(15 * 60);

    /// Creates a cache with the default TTL of 15 minutes
    pub fn new(store: Arc<dyn ForecastStore>) -> Self {
        let mut cache = Self {
            store,
            ttl_seconds: 0,
        };
        cache.set_ttl(Self::DEFAULT_TTL);
        cache
    }

    /// Sets the TTL used for every cache record. Only whole seconds are kept.
    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl_seconds = ttl.as_secs();
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Cached forecast for `coordinate`; `None` when nothing is cached
    #[tracing::instrument(name = "get_cached_forecast", level = "debug", skip(self), fields(key = %coordinate.cache_key()))]
    pub async fn get(&self, coordinate: &Coordinate) -> Result<Option<Forecast>, StoreError> {
        let Some(raw) = self.store.get(&coordinate.cache_key()).await? else {
            return Ok(None);
        };
        let forecast = serde_json::from_slice(&raw).map_err(StoreError::Decode)?;
        Ok(Some(forecast))
    }

    /// Caches `forecast` unless a live entry for `coordinate` already exists
    #[tracing::instrument(name = "put_cached_forecast", level = "debug", skip(self, forecast), fields(key = %coordinate.cache_key()))]
    pub async fn put(&self, coordinate: &Coordinate, forecast: &Forecast) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec(forecast).map_err(StoreError::Encode)?;
        let written = self
            .store
            .set_if_absent(&coordinate.cache_key(), encoded, self.ttl_seconds)
            .await?;
        if !written {
            debug!("forecast already cached, keeping existing entry");
        }
        Ok(())
    }
}
