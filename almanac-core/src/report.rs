//! Outcome of a full fetch-resample-merge run.

use serde::Serialize;

use crate::AlmanacError;
use crate::series::{Availability, SeriesId};
use crate::table::AlignedTable;
use crate::timeseries::infer::Cadence;

/// Per-series diagnostics collected while aligning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    /// Column label.
    pub id: SeriesId,
    /// Provider the series was requested from.
    pub provider: String,
    /// Provider-specific symbol.
    pub symbol: String,
    /// Whether the series carried data.
    pub availability: Availability,
    /// Native cadence of the source observations.
    pub cadence: Cadence,
    /// Finite source observations before resampling.
    pub observations: usize,
    /// Present cells in the aligned table.
    pub present_cells: usize,
}

/// Aligned table plus the diagnostics gathered while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignReport {
    /// The merged table.
    pub table: AlignedTable,
    /// One entry per requested series, in column order.
    pub columns: Vec<ColumnReport>,
    /// Provider failures that were degraded to missing series.
    pub warnings: Vec<AlmanacError>,
}

impl AlignReport {
    /// Report entry for `id`.
    #[must_use]
    pub fn column(&self, id: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|c| c.id.as_str() == id)
    }
}
