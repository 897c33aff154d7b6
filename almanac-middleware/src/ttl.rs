use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use almanac_types::{AlmanacError, CacheConfig};
use moka::future::Cache;

/// Keyed result cache with a per-entry time-to-live.
///
/// Concurrent lookups of the same absent key run the computation once; the
/// other callers wait for its result. Failed computations are not stored.
/// A zero TTL (or zero capacity) disables storage entirely and every lookup
/// recomputes.
pub struct TtlCache<K, V> {
    inner: Option<Cache<K, V>>,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> std::fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("enabled", &self.inner.is_some())
            .finish()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Build a cache from its configuration.
    #[must_use]
    pub fn new(cfg: &CacheConfig) -> Self {
        if cfg.is_disabled() {
            return Self { inner: None };
        }
        let cache = Cache::builder()
            .max_capacity(cfg.max_entries)
            .time_to_live(cfg.ttl)
            .build();
        Self { inner: Some(cache) }
    }

    /// True when entries are stored at all.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Return the cached value for `key`, or run `init` and cache its success.
    ///
    /// # Errors
    /// Propagates the error of `init`; nothing is stored in that case.
    pub async fn get_or_try_compute<F>(&self, key: K, init: F) -> Result<V, AlmanacError>
    where
        F: Future<Output = Result<V, AlmanacError>>,
    {
        let Some(cache) = &self.inner else {
            return init.await;
        };
        let init = async {
            #[cfg(feature = "tracing")]
            tracing::debug!("cache miss; computing");
            init.await
        };
        cache
            .try_get_with(key, init)
            .await
            .map_err(Arc::unwrap_or_clone)
    }

    /// Cached value for `key`, if present and not expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.inner.as_ref()?.get(key).await
    }

    /// Drop the entry for `key`.
    pub async fn invalidate(&self, key: &K) {
        if let Some(cache) = &self.inner {
            cache.invalidate(key).await;
        }
    }

    /// Number of live entries after pending maintenance has run.
    pub async fn entry_count(&self) -> u64 {
        match &self.inner {
            Some(cache) => {
                cache.run_pending_tasks().await;
                cache.entry_count()
            }
            None => 0,
        }
    }
}
