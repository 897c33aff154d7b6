//! Configuration and policy types shared across the orchestrator, core, and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Target step of the canonical grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Frequency {
    /// One calendar month, labelled by the first day of the month.
    #[default]
    Monthly,
}

/// How months without a source observation are filled during resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FillPolicy {
    /// Carry the most recent prior observation forward into empty months.
    #[default]
    LastObserved,
    /// Leave empty months absent.
    None,
}

/// How resampled series are combined into a table.
///
/// Has no `Default`; callers pick one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinPolicy {
    /// Union of all months; absent cells are allowed.
    Outer,
    /// Only months where every constraining series holds a value.
    Inner,
}

/// What the orchestrator does when a provider cannot deliver a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnavailablePolicy {
    /// Substitute an explicit missing-series marker and record a warning.
    #[default]
    MarkMissing,
    /// Abort the whole alignment with the provider's error.
    Fail,
}

/// What a connector does when its credential is not configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CredentialPolicy {
    /// Return a missing-series marker instead of calling the provider.
    #[default]
    Degrade,
    /// Fail with `AlmanacError::MissingCredential`.
    Fail,
}

/// Time-to-live cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a computed entry stays valid. Zero disables caching.
    pub ttl: Duration,
    /// Upper bound on the number of cached entries.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_entries: 64,
        }
    }
}

impl CacheConfig {
    /// Returns true when entries would expire immediately.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.ttl.is_zero() || self.max_entries == 0
    }
}

/// Global configuration for the `Almanac` orchestrator.
///
/// `join_policy` has no default; a config can only be built with an explicit choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlmanacConfig {
    /// Join policy applied when merging resampled series.
    pub join_policy: JoinPolicy,
    /// Fill policy applied when resampling every fetched series.
    #[serde(default)]
    pub fill_policy: FillPolicy,
    /// Target grid step.
    #[serde(default)]
    pub frequency: Frequency,
    /// Behavior when a provider fails, times out, or is not registered.
    #[serde(default)]
    pub unavailable_policy: UnavailablePolicy,
    /// Timeout for individual provider requests.
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout: Duration,
    /// Optional overall deadline for the fetch fan-out.
    #[serde(default)]
    pub request_timeout: Option<Duration>,
    /// Optional memoisation of whole alignment results.
    #[serde(default)]
    pub cache: Option<CacheConfig>,
}

const fn default_provider_timeout() -> Duration {
    Duration::from_secs(10)
}

impl AlmanacConfig {
    /// Build a config with the given join policy and defaults for everything else.
    #[must_use]
    pub const fn new(join_policy: JoinPolicy) -> Self {
        Self {
            join_policy,
            fill_policy: FillPolicy::LastObserved,
            frequency: Frequency::Monthly,
            unavailable_policy: UnavailablePolicy::MarkMissing,
            provider_timeout: default_provider_timeout(),
            request_timeout: None,
            cache: None,
        }
    }
}
