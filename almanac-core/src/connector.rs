use async_trait::async_trait;

pub use almanac_types::ConnectorKey;

use crate::AlmanacError;
use crate::month::MonthRange;
use crate::series::{SeriesId, SeriesInput};

/// One series to fetch: the column label, the provider to ask, and the
/// provider-specific symbol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesRequest {
    /// Column label in the aligned table.
    pub id: SeriesId,
    /// Registered provider that serves `symbol`.
    pub provider: ConnectorKey,
    /// Provider-specific symbol or series code (e.g. `CHF=X`, `CPIAUCSL`).
    pub symbol: String,
}

impl SeriesRequest {
    /// Build a request.
    pub fn new(
        id: impl Into<SeriesId>,
        provider: ConnectorKey,
        symbol: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            provider,
            symbol: symbol.into(),
        }
    }
}

/// A data provider that returns named series for provider-specific symbols.
#[async_trait]
pub trait SeriesConnector: Send + Sync {
    /// A stable identifier used to route requests (e.g., "almanac-fred").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Fetch the series for `req.symbol`, labelled `req.id`.
    ///
    /// `window` is a hint; connectors may return observations outside it.
    /// A connector that cannot serve the series without failing the caller
    /// (e.g. no credential under a degrade policy) returns
    /// [`SeriesInput::Missing`].
    async fn fetch(
        &self,
        req: &SeriesRequest,
        window: Option<MonthRange>,
    ) -> Result<SeriesInput, AlmanacError>;
}
