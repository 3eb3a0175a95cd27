//! Rate cache: the injected store capability and the in-memory default.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

/// Last known rate for a key and when it was fetched.
///
/// Immutable once written; refreshes replace the entry wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateEntry {
    pub rate: String,
    pub fetched_at: Instant,
}

impl RateEntry {
    /// Entry stamped with the current time.
    pub fn new(rate: impl Into<String>) -> Self {
        Self {
            rate: rate.into(),
            fetched_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.fetched_at.elapsed()
    }
}

/// Injected key-value capability with TTL support.
///
/// Writes are best-effort: the backing store may evict entries early per
/// its own policy. An absent entry means never fetched or store-evicted,
/// never "expired by the core". The core itself does not delete.
pub trait RateStore: Send + Sync {
    fn read<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<RateEntry>> + Send + 'a>>;

    fn write<'a>(
        &'a self,
        key: String,
        entry: RateEntry,
        ttl: Duration,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

#[derive(Debug, Clone)]
struct StoredEntry {
    entry: RateEntry,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct StoreInner {
    map: HashMap<String, StoredEntry>,
}

impl StoreInner {
    fn get(&self, key: &str) -> Option<RateEntry> {
        self.map.get(key).and_then(|stored| {
            if Instant::now() <= stored.expires_at {
                Some(stored.entry.clone())
            } else {
                None
            }
        })
    }

    fn put(&mut self, key: String, entry: RateEntry, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.map.insert(key, StoredEntry { entry, expires_at });
    }
}

/// Thread-safe in-memory rate store with read-time expiry.
#[derive(Debug, Clone, Default)]
pub struct MemoryRateStore {
    inner: Arc<tokio::sync::RwLock<StoreInner>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, expired ones included.
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.map.len()
    }

    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.map.clear();
    }
}

impl RateStore for MemoryRateStore {
    fn read<'a>(
        &'a self,
        key: &'a str,
    ) -> Pin<Box<dyn Future<Output = Option<RateEntry>> + Send + 'a>> {
        Box::pin(async move {
            let store = self.inner.read().await;
            let entry = store.get(key);
            if entry.is_some() {
                debug!(key, "cache hit");
            } else {
                debug!(key, "cache miss");
            }
            entry
        })
    }

    fn write<'a>(
        &'a self,
        key: String,
        entry: RateEntry,
        ttl: Duration,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let mut store = self.inner.write().await;
            debug!(key = key.as_str(), "cache write");
            store.put(key, entry, ttl);
        })
    }
}
