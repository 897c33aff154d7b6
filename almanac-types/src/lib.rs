//! Almanac-specific error, policy, and configuration primitives.
#![warn(missing_docs)]

mod config;
mod connector;
mod error;

pub use config::{
    AlmanacConfig, CacheConfig, CredentialPolicy, FillPolicy, Frequency, JoinPolicy,
    UnavailablePolicy,
};
pub use connector::ConnectorKey;
pub use error::AlmanacError;
