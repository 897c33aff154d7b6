use almanac_types::CredentialPolicy;
use serde::{Deserialize, Serialize};

/// Environment variable read by [`FredConfig::from_env`].
pub const API_KEY_VAR: &str = "FRED_API_KEY";

/// Default FRED API root.
pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// Explicit configuration for the FRED connector.
///
/// The API key is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FredConfig {
    /// FRED API key; `None` triggers `on_missing_credential`.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// API root, overridable for tests and proxies.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// What to do when `api_key` is absent.
    #[serde(default)]
    pub on_missing_credential: CredentialPolicy,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for FredConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            on_missing_credential: CredentialPolicy::Degrade,
        }
    }
}

impl FredConfig {
    /// Defaults with the key taken from `FRED_API_KEY`, if set and non-empty.
    #[must_use]
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Self {
            api_key,
            ..Self::default()
        }
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the API root.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Choose the behavior when no key is configured.
    #[must_use]
    pub const fn on_missing_credential(mut self, policy: CredentialPolicy) -> Self {
        self.on_missing_credential = policy;
        self
    }
}
