//! almanac-middleware
//!
//! Time-to-live memoisation for almanac.
//!
//! - [`TtlCache`]: a keyed result cache with at most one concurrent
//!   computation per key. The orchestrator uses it to memoise whole
//!   alignment runs.
//! - [`CachingConnector`]: wraps a `SeriesConnector` and memoises each
//!   `(symbol, window)` fetch.
//! - [`ConnectorBuilder`]: composes a raw connector with middleware layers.
#![warn(missing_docs)]

mod builder;
mod cache;
mod ttl;

pub use crate::builder::ConnectorBuilder;
pub use crate::cache::{CacheMiddleware, CachingConnector};
pub use crate::ttl::TtlCache;
