use std::sync::Arc;

use almanac::{
    AlmanacError, CacheConfig, ConnectorKey, Month, MonthRange, SeriesConnector, SeriesRequest,
};
use almanac_fred::FredConnector;
use almanac_middleware::ConnectorBuilder;
use almanac_mock::MockConnector;
use almanac_yahoo::YahooConnector;

/// Environment variable that switches every demo to fixture data.
pub const USE_MOCK_VAR: &str = "ALMANAC_USE_MOCK";

/// True when demos should run against the mock connector.
#[must_use]
pub fn use_mock() -> bool {
    std::env::var(USE_MOCK_VAR).is_ok()
}

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Suggested: `RUST_LOG=info,almanac=debug`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}

/// Connectors for the demos, each memoised for a day per `(symbol, window)`.
#[must_use]
pub fn get_connectors() -> Vec<Arc<dyn SeriesConnector>> {
    if use_mock() {
        println!("--- (Using Mock Connector for CI) ---");
        return vec![Arc::new(MockConnector::new())];
    }
    let cache = CacheConfig::default();
    let yahoo: Arc<dyn SeriesConnector> = Arc::new(YahooConnector::new_default());
    let fred: Arc<dyn SeriesConnector> = Arc::new(FredConnector::from_env());
    vec![
        ConnectorBuilder::new(yahoo).with_cache(&cache).build(),
        ConnectorBuilder::new(fred).with_cache(&cache).build(),
    ]
}

fn market_key() -> ConnectorKey {
    if use_mock() {
        ConnectorKey::new("almanac-mock")
    } else {
        YahooConnector::KEY
    }
}

fn macro_key() -> ConnectorKey {
    if use_mock() {
        ConnectorKey::new("almanac-mock")
    } else {
        FredConnector::KEY
    }
}

/// USD/CHF against the macro series that usually explain it.
#[must_use]
pub fn usd_chf_basket() -> Vec<SeriesRequest> {
    vec![
        SeriesRequest::new("USDCHF", market_key(), "CHF=X"),
        SeriesRequest::new("GOLD", market_key(), "GC=F"),
        SeriesRequest::new("BRENT", market_key(), "BZ=F"),
        SeriesRequest::new("SP500", market_key(), "^GSPC"),
        SeriesRequest::new("MSCI_WORLD", market_key(), "URTH"),
        SeriesRequest::new("US_RATE", macro_key(), "FEDFUNDS"),
        SeriesRequest::new("CH_RATE", macro_key(), "IR3TIB01CHM156N"),
        SeriesRequest::new("US_CPI", macro_key(), "CPIAUCSL"),
        SeriesRequest::new("CH_CPI", macro_key(), "CPHPTT01CHM659N"),
        SeriesRequest::new("CH_GDP", macro_key(), "NAEXKP01CHQ657S"),
        SeriesRequest::new("CH_EXPORTS", macro_key(), "XTEXVA01CHM667S"),
    ]
}

/// Window for the basket demo: the fixture years under the mock, otherwise
/// 1995-01 through the current month.
///
/// # Errors
/// Returns `InvalidArg` if the bounds do not form a range.
pub fn basket_window() -> Result<MonthRange, AlmanacError> {
    if use_mock() {
        return MonthRange::new(Month::new(2019, 1)?, Month::new(2020, 12)?);
    }
    let today = chrono::Utc::now().date_naive();
    MonthRange::new(Month::new(1995, 1)?, Month::of_date(today))
}
