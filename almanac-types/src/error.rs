use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the almanac workspace.
///
/// This covers argument validation, provider-tagged failures, credential
/// absence, timeouts, and data issues surfaced while aligning series.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AlmanacError {
    /// Issues with the returned or expected data (malformed payloads, bad dates, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument or configuration.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A series or symbol could not be found by its provider.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "series CPIAUCSL".
        what: String,
    },

    /// A connector requires a credential that was not configured.
    #[error("{connector} requires a credential: set {variable}")]
    MissingCredential {
        /// Connector name that needs the credential.
        connector: String,
        /// Name of the configuration key or environment variable.
        variable: String,
    },

    /// The same series identifier was supplied more than once.
    #[error("duplicate series id '{id}'")]
    DuplicateSeries {
        /// The offending identifier.
        id: String,
    },

    /// A request named a provider that is not registered.
    #[error("unknown provider: {provider}")]
    UnknownProvider {
        /// The provider key that could not be resolved.
        provider: String,
    },

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {series} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Series identifier being fetched.
        series: String,
    },

    /// The overall request exceeded the configured deadline.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Label of the operation that timed out (e.g. "align").
        capability: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl AlmanacError {
    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `MissingCredential` error.
    pub fn missing_credential(connector: impl Into<String>, variable: impl Into<String>) -> Self {
        Self::MissingCredential {
            connector: connector.into(),
            variable: variable.into(),
        }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, series: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            series: series.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Returns true if this error should be surfaced to users as actionable.
    ///
    /// A missing series upstream (`NotFound`) is benign for alignment purposes;
    /// everything else points at configuration or provider trouble.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }
}
