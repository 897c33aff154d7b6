// Shared fixtures for orchestrator tests; not every test file uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use almanac::{ConnectorKey, Month, MonthRange, Series, SeriesConnector, SeriesRequest};
use almanac_mock::{DynamicMockConnector, DynamicMockController, MockConnector};
use chrono::{DateTime, Utc};

pub const DYN: &str = "dyn-mock";
pub const DYN_KEY: ConnectorKey = ConnectorKey::new(DYN);
pub const MOCK_KEY: ConnectorKey = ConnectorKey::new("almanac-mock");

pub fn m(s: &str) -> Month {
    s.parse().unwrap()
}

pub fn window(a: &str, b: &str) -> MonthRange {
    MonthRange::new(m(a), m(b)).unwrap()
}

/// Construct a UTC `DateTime` from date components.
pub fn dt(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
    chrono::NaiveDate::from_ymd_opt(y, mo, d)
        .expect("invalid date")
        .and_hms_opt(0, 0, 0)
        .expect("invalid time")
        .and_utc()
}

/// Series from `(YYYY-MM-DD, value)` pairs.
pub fn series(id: &str, points: &[(&str, f64)]) -> Series {
    Series::from_observations(
        id,
        points.iter().map(|(d, v)| {
            let date = chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap();
            (date.and_hms_opt(0, 0, 0).unwrap().and_utc(), *v)
        }),
    )
}

pub fn req(id: &str, symbol: &str) -> SeriesRequest {
    SeriesRequest::new(id, DYN_KEY, symbol)
}

pub fn mock_req(id: &str, symbol: &str) -> SeriesRequest {
    SeriesRequest::new(id, MOCK_KEY, symbol)
}

pub fn dynamic() -> (Arc<dyn SeriesConnector>, DynamicMockController) {
    DynamicMockConnector::new_with_controller(DYN)
}

pub fn fixtures() -> Arc<dyn SeriesConnector> {
    Arc::new(MockConnector::new())
}

/// Connector that answers every symbol with a fixed series after a delay and
/// counts its calls.
pub struct SlowCounter {
    pub delay: std::time::Duration,
    pub calls: std::sync::atomic::AtomicUsize,
}

impl SlowCounter {
    pub fn new(delay: std::time::Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            calls: std::sync::atomic::AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SeriesConnector for SlowCounter {
    fn name(&self) -> &'static str {
        DYN
    }

    async fn fetch(
        &self,
        req: &SeriesRequest,
        _window: Option<MonthRange>,
    ) -> Result<almanac::SeriesInput, almanac::AlmanacError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(series(req.id.as_str(), &[("2020-01-01", 1.0), ("2020-02-01", 2.0)]).into())
    }
}
