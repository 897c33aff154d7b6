//! Mock connectors for CI-safe tests and demos.
//!
//! [`MockConnector`] serves deterministic fixture series. A few reserved
//! symbols simulate provider trouble:
//!
//! - `FAIL`: returns a connector error.
//! - `TIMEOUT`: sleeps for 200ms before answering with a short series.
//! - `MISSING`: returns an explicit missing-series marker.
//!
//! [`DynamicMockConnector`] lets tests script behavior per symbol.
#![warn(missing_docs)]

use std::time::Duration;

use almanac_core::{
    AlmanacError, Month, MonthRange, Series, SeriesConnector, SeriesInput, SeriesRequest,
};
use async_trait::async_trait;

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};

/// Mock connector backed by static fixtures.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Delay applied to the `TIMEOUT` symbol.
    pub const TIMEOUT_DELAY: Duration = Duration::from_millis(200);

    /// Create the fixture-backed connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// The fixture behind `symbol`, unfiltered.
    #[must_use]
    pub fn fixture(symbol: &str) -> Option<Series> {
        fixtures::by_symbol(symbol)
    }
}

/// Keep only observations whose local month lies inside `window`.
pub(crate) fn clip(series: Series, window: Option<MonthRange>) -> Series {
    let Some(window) = window else {
        return series;
    };
    let tz = series.timezone();
    let kept = series
        .finite()
        .filter(|(ts, _)| window.contains(Month::of_datetime(*ts, tz)))
        .collect::<Vec<_>>();
    let clipped = Series::from_observations(series.id().clone(), kept);
    match tz {
        Some(tz) => clipped.with_timezone(tz),
        None => clipped,
    }
}

#[async_trait]
impl SeriesConnector for MockConnector {
    fn name(&self) -> &'static str {
        "almanac-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    async fn fetch(
        &self,
        req: &SeriesRequest,
        window: Option<MonthRange>,
    ) -> Result<SeriesInput, AlmanacError> {
        let series = match req.symbol.as_str() {
            "FAIL" => {
                return Err(AlmanacError::connector(
                    self.name(),
                    "forced failure: fetch",
                ));
            }
            "MISSING" => {
                return Ok(SeriesInput::missing(
                    req.id.clone(),
                    "mock provider reports series unavailable",
                ));
            }
            "TIMEOUT" => {
                tokio::time::sleep(Self::TIMEOUT_DELAY).await;
                fixtures::by_symbol("CPIAUCSL")
            }
            other => fixtures::by_symbol(other),
        }
        .ok_or_else(|| AlmanacError::not_found(format!("series {}", req.symbol)))?;

        let labelled = SeriesInput::from(clip(series, window)).with_id(req.id.clone());
        Ok(labelled)
    }
}
