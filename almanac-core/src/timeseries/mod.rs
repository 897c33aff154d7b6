//! Time-series utilities shared by connectors and the orchestrator.
//!
//! Modules include:
//! - `infer`: estimate the native cadence of a source series
//! - `merge`: join resampled series into one aligned table
//! - `resample`: reindex irregular series onto the monthly grid
/// Cadence inference helpers.
pub mod infer;
/// Join utilities for combining resampled series.
pub mod merge;
/// Resampling onto the first-of-month grid.
pub mod resample;
