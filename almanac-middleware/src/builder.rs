//! Builder for composing connectors with middleware layers.
//!
//! Layers are stored outermost-first (the last one added wraps all others)
//! and applied in reverse during `build()`:
//!
//! ```text
//! builder.layer(A).layer(B)
//!
//! Storage: [B, A]
//! Result:  B(A(Raw))
//! ```

use std::sync::Arc;

use almanac_core::{Middleware, SeriesConnector};
use almanac_types::CacheConfig;

use crate::cache::CacheMiddleware;

const CACHE_LAYER: &str = "CachingMiddleware";

/// Generic middleware builder for composing a connector with layered wrappers.
pub struct ConnectorBuilder {
    raw: Arc<dyn SeriesConnector>,
    /// Middleware layers in outermost-first order.
    layers: Vec<Box<dyn Middleware>>,
}

impl ConnectorBuilder {
    /// Create a new builder from a raw, unwrapped connector.
    #[must_use]
    pub fn new(raw: Arc<dyn SeriesConnector>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add or replace the per-series fetch cache.
    ///
    /// The cache is placed outermost so a hit never reaches inner layers.
    #[must_use]
    pub fn with_cache(mut self, cfg: &CacheConfig) -> Self {
        self.layers.retain(|m| m.name() != CACHE_LAYER);
        self.layers
            .insert(0, Box::new(CacheMiddleware::new(cfg.clone())));
        self
    }

    /// Remove the cache if present.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.layers.retain(|m| m.name() != CACHE_LAYER);
        self
    }

    /// Add an arbitrary middleware layer at the outermost position.
    #[must_use]
    pub fn layer(mut self, layer: Box<dyn Middleware>) -> Self {
        self.layers.insert(0, layer);
        self
    }

    /// Layer names and configuration snapshots, outermost first.
    #[must_use]
    pub fn describe(&self) -> Vec<(&'static str, serde_json::Value)> {
        self.layers
            .iter()
            .map(|l| (l.name(), l.config_json()))
            .collect()
    }

    /// Build the wrapped connector.
    #[must_use]
    pub fn build(self) -> Arc<dyn SeriesConnector> {
        let mut acc: Arc<dyn SeriesConnector> = Arc::clone(&self.raw);
        // Apply innermost first
        for m in self.layers.into_iter().rev() {
            acc = m.apply(acc);
        }
        acc
    }
}
