//! Almanac fetches financial and macroeconomic series from several providers
//! and aligns them onto one first-of-month table.
//!
//! Overview
//! - Routes each [`SeriesRequest`] to the connector registered under its
//!   provider key and fetches all requests concurrently.
//! - Resamples every series onto the monthly grid (last observation in a
//!   month wins, optional forward fill) and merges the results under an
//!   explicit [`JoinPolicy`].
//! - Degrades unavailable providers to explicit missing columns, or fails the
//!   run, according to [`UnavailablePolicy`].
//! - Optionally memoises whole runs for a time-to-live.
//!
//! Key behaviors
//! - The join policy has no default; [`AlmanacBuilder::build`] rejects a
//!   builder that never chose one.
//! - `Outer` keeps every month of the combined span and forward-fills a
//!   series past its last observation when its fill policy is `LastObserved`.
//! - `Inner` keeps only months where every observed series holds a value;
//!   empty and missing series stay as all-absent columns.
//! - Columns are ordered by series id regardless of request order.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use almanac::{Almanac, JoinPolicy, SeriesRequest};
//! use almanac_fred::FredConnector;
//! use almanac_yahoo::YahooConnector;
//!
//! let almanac = Almanac::builder()
//!     .with_connector(Arc::new(YahooConnector::new_default()))
//!     .with_connector(Arc::new(FredConnector::from_env()))
//!     .join_policy(JoinPolicy::Outer)
//!     .build()?;
//!
//! let report = almanac
//!     .align()
//!     .series(&[
//!         SeriesRequest::new("USDCHF", YahooConnector::KEY, "CHF=X"),
//!         SeriesRequest::new("US_CPI", FredConnector::KEY, "CPIAUCSL"),
//!     ])?
//!     .run()
//!     .await?;
//! println!("{}", report.table.to_csv_string()?);
//! ```
#![warn(missing_docs)]

mod align;
mod core;
mod util;

pub use crate::align::AlignBuilder;
pub use crate::core::{Almanac, AlmanacBuilder, tag_err};
pub use almanac_core::{
    AlignReport, AlignedTable, AlmanacConfig, AlmanacError, Availability, CacheConfig, Cadence,
    Column, ColumnReport, ConnectorKey, CorrelationMatrix, FillPolicy, Frequency, JoinPolicy,
    LinearFit, MissingSeries, Month, MonthRange, RegularSeries, Series, SeriesConnector, SeriesId,
    SeriesInput, SeriesRequest, UnavailablePolicy,
};
