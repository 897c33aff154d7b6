use std::sync::Arc;
use std::time::Duration;

use almanac_core::{
    AlignReport, AlmanacConfig, AlmanacError, CacheConfig, ConnectorKey, FillPolicy, Frequency,
    JoinPolicy, MonthRange, SeriesConnector, SeriesRequest, UnavailablePolicy,
};
use almanac_middleware::TtlCache;

/// Canonical identity of an alignment run, used as the result-cache key.
///
/// Requests are stored sorted so two runs over the same set in a different
/// order share one entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct AlignKey {
    pub(crate) requests: Vec<SeriesRequest>,
    pub(crate) window: Option<MonthRange>,
    pub(crate) join: JoinPolicy,
    pub(crate) fill: FillPolicy,
    pub(crate) unavailable: UnavailablePolicy,
}

/// Orchestrator that fetches series from registered providers and aligns them.
pub struct Almanac {
    pub(crate) connectors: Vec<Arc<dyn SeriesConnector>>,
    pub(crate) cfg: AlmanacConfig,
    pub(crate) cache: Option<TtlCache<AlignKey, Arc<AlignReport>>>,
}

/// Builder for constructing an [`Almanac`] orchestrator.
///
/// Every setting has a default except the join policy, which must be chosen
/// explicitly before [`AlmanacBuilder::build`] succeeds.
pub struct AlmanacBuilder {
    connectors: Vec<Arc<dyn SeriesConnector>>,
    join_policy: Option<JoinPolicy>,
    fill_policy: FillPolicy,
    frequency: Frequency,
    unavailable_policy: UnavailablePolicy,
    provider_timeout: Duration,
    request_timeout: Option<Duration>,
    cache: Option<CacheConfig>,
}

impl Default for AlmanacBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AlmanacBuilder {
    /// Create a builder with no connectors and no join policy.
    #[must_use]
    pub fn new() -> Self {
        let defaults = AlmanacConfig::new(JoinPolicy::Outer);
        Self {
            connectors: vec![],
            join_policy: None,
            fill_policy: defaults.fill_policy,
            frequency: defaults.frequency,
            unavailable_policy: defaults.unavailable_policy,
            provider_timeout: defaults.provider_timeout,
            request_timeout: defaults.request_timeout,
            cache: defaults.cache,
        }
    }

    /// Start from a complete configuration, including its join policy.
    #[must_use]
    pub fn config(mut self, cfg: AlmanacConfig) -> Self {
        self.join_policy = Some(cfg.join_policy);
        self.fill_policy = cfg.fill_policy;
        self.frequency = cfg.frequency;
        self.unavailable_policy = cfg.unavailable_policy;
        self.provider_timeout = cfg.provider_timeout;
        self.request_timeout = cfg.request_timeout;
        self.cache = cfg.cache;
        self
    }

    /// Register a provider connector.
    ///
    /// Requests are routed by connector name. When two connectors share a
    /// name the first registered one serves the requests.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn SeriesConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Choose how resampled series are combined. Required.
    #[must_use]
    pub const fn join_policy(mut self, join: JoinPolicy) -> Self {
        self.join_policy = Some(join);
        self
    }

    /// Choose how months without observations are filled while resampling.
    #[must_use]
    pub const fn fill_policy(mut self, fill: FillPolicy) -> Self {
        self.fill_policy = fill;
        self
    }

    /// Choose what happens when a provider cannot deliver a series.
    #[must_use]
    pub const fn unavailable_policy(mut self, policy: UnavailablePolicy) -> Self {
        self.unavailable_policy = policy;
        self
    }

    /// Set the per-provider request timeout.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Set an overall deadline for the fetch fan-out of one run.
    ///
    /// When exceeded the run fails with `RequestTimeout("align")` regardless
    /// of the unavailable policy.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Memoise whole alignment results for `cfg.ttl`.
    #[must_use]
    pub fn cache(mut self, cfg: CacheConfig) -> Self {
        self.cache = Some(cfg);
        self
    }

    /// Build the orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no join policy was chosen or no connectors
    /// have been registered via [`with_connector`](Self::with_connector).
    pub fn build(self) -> Result<Almanac, AlmanacError> {
        let Some(join_policy) = self.join_policy else {
            return Err(AlmanacError::InvalidArg(
                "join policy is required; choose JoinPolicy::Outer or JoinPolicy::Inner"
                    .to_string(),
            ));
        };
        if self.connectors.is_empty() {
            return Err(AlmanacError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }
        if self.provider_timeout.is_zero() {
            return Err(AlmanacError::InvalidArg(
                "provider timeout must be greater than zero".to_string(),
            ));
        }

        let cache = self.cache.as_ref().map(TtlCache::new);
        let cfg = AlmanacConfig {
            join_policy,
            fill_policy: self.fill_policy,
            frequency: self.frequency,
            unavailable_policy: self.unavailable_policy,
            provider_timeout: self.provider_timeout,
            request_timeout: self.request_timeout,
            cache: self.cache,
        };
        Ok(Almanac {
            connectors: self.connectors,
            cfg,
            cache,
        })
    }
}

/// Attribute an untagged error to the connector that produced it.
///
/// Errors that already name their origin pass through unchanged.
pub fn tag_err(connector: &str, e: AlmanacError) -> AlmanacError {
    match e {
        e @ (AlmanacError::NotFound { .. }
        | AlmanacError::ProviderTimeout { .. }
        | AlmanacError::Connector { .. }
        | AlmanacError::RequestTimeout { .. }
        | AlmanacError::MissingCredential { .. }
        | AlmanacError::UnknownProvider { .. }) => e,
        other => AlmanacError::Connector {
            connector: connector.to_string(),
            msg: other.to_string(),
        },
    }
}

/// Apply an optional overall deadline to `fut`.
pub(crate) async fn with_request_deadline<T, Fut>(
    deadline: Option<Duration>,
    capability: &str,
    fut: Fut,
) -> Result<T, AlmanacError>
where
    Fut: core::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| AlmanacError::request_timeout(capability)),
        None => Ok(fut.await),
    }
}

impl Almanac {
    /// Start building a new `Almanac` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use almanac::{Almanac, JoinPolicy};
    /// use almanac_fred::FredConnector;
    /// use almanac_yahoo::YahooConnector;
    ///
    /// let almanac = Almanac::builder()
    ///     .with_connector(Arc::new(YahooConnector::new_default()))
    ///     .with_connector(Arc::new(FredConnector::from_env()))
    ///     .join_policy(JoinPolicy::Outer)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> AlmanacBuilder {
        AlmanacBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &AlmanacConfig {
        &self.cfg
    }

    /// Registered connector serving `key`, if any.
    #[must_use]
    pub fn connector(&self, key: &ConnectorKey) -> Option<&Arc<dyn SeriesConnector>> {
        self.connectors.iter().find(|c| c.name() == key.as_str())
    }

    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "almanac::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                series = series,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        series: &str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, AlmanacError>
    where
        Fut: core::future::Future<Output = Result<T, AlmanacError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(AlmanacError::provider_timeout(connector_name, series)))
    }
}
