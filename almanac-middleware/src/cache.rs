use std::sync::Arc;

use almanac_core::{MonthRange, SeriesConnector, SeriesInput, SeriesRequest};
use almanac_types::{AlmanacError, CacheConfig};
use async_trait::async_trait;

use crate::ttl::TtlCache;

/// Identity of a provider fetch; the column label is not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FetchKey {
    symbol: String,
    window: Option<MonthRange>,
}

/// Middleware descriptor that installs a [`CachingConnector`].
pub struct CacheMiddleware {
    cfg: CacheConfig,
}

impl CacheMiddleware {
    /// Create the middleware from its cache configuration.
    #[must_use]
    pub const fn new(cfg: CacheConfig) -> Self {
        Self { cfg }
    }
}

impl almanac_core::Middleware for CacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn SeriesConnector>) -> Arc<dyn SeriesConnector> {
        let Self { cfg } = *self;
        Arc::new(CachingConnector::new(inner, &cfg))
    }

    fn name(&self) -> &'static str {
        "CachingMiddleware"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ttl_ms": u64::try_from(self.cfg.ttl.as_millis()).unwrap_or(u64::MAX),
            "max_entries": self.cfg.max_entries,
        })
    }
}

/// Connector wrapper that memoises successful fetches per `(symbol, window)`.
///
/// Errors are never cached. A cached result is relabelled with the id of the
/// request that hit it.
pub struct CachingConnector {
    inner: Arc<dyn SeriesConnector>,
    cache: TtlCache<FetchKey, SeriesInput>,
}

impl CachingConnector {
    /// Wrap `inner` with a cache built from `cfg`.
    #[must_use]
    pub fn new(inner: Arc<dyn SeriesConnector>, cfg: &CacheConfig) -> Self {
        Self {
            inner,
            cache: TtlCache::new(cfg),
        }
    }
}

#[async_trait]
impl SeriesConnector for CachingConnector {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn vendor(&self) -> &'static str {
        self.inner.vendor()
    }

    async fn fetch(
        &self,
        req: &SeriesRequest,
        window: Option<MonthRange>,
    ) -> Result<SeriesInput, AlmanacError> {
        let key = FetchKey {
            symbol: req.symbol.clone(),
            window,
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(connector = self.inner.name(), symbol = %req.symbol, "cached fetch");
        let got = self
            .cache
            .get_or_try_compute(key, self.inner.fetch(req, window))
            .await?;
        Ok(got.with_id(req.id.clone()))
    }
}
