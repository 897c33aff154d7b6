//! almanac-core
//!
//! Core types, traits, and utilities shared across the almanac workspace.
//!
//! - `month`: the first-of-month grid (`Month`, `MonthRange`).
//! - `series`: named source series, missing markers, and resampled series.
//! - `timeseries`: resample onto the grid, merge into a table, infer cadence.
//! - `table`: the aligned table and its CSV/DataFrame export.
//! - `analysis`: pairwise-complete correlation and OLS trendlines.
//! - `connector`: the `SeriesConnector` trait implemented by data providers.
//!
//! Resampling and merging are pure functions; only `SeriesConnector::fetch`
//! is async.
#![warn(missing_docs)]

/// Pairwise-complete statistics over aligned columns.
pub mod analysis;
/// The `SeriesConnector` trait and series requests.
pub mod connector;
/// Middleware trait implemented by connector wrappers.
pub mod middleware;
pub mod month;
pub mod report;
pub mod series;
pub mod table;
/// Time-series utilities for resampling, merging, and cadence inference.
pub mod timeseries;

pub use almanac_types::{
    AlmanacConfig, AlmanacError, CacheConfig, CredentialPolicy, FillPolicy, Frequency, JoinPolicy,
    UnavailablePolicy,
};
pub use analysis::{CorrelationMatrix, LinearFit, ols, pearson};
pub use connector::{ConnectorKey, SeriesConnector, SeriesRequest};
pub use middleware::Middleware;
pub use month::{Month, MonthIter, MonthRange};
pub use report::{AlignReport, ColumnReport};
pub use series::{Availability, MissingSeries, RegularSeries, Series, SeriesId, SeriesInput};
pub use table::{AlignedTable, Column};
pub use timeseries::infer::{Cadence, estimate_step_days, native_cadence};
pub use timeseries::merge::merge;
pub use timeseries::resample::{resample, resample_within};
