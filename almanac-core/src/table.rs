//! The aligned table produced by merging resampled series.

use std::io;

use crate::month::Month;
use crate::series::{Availability, Series, SeriesId};
use crate::{AlmanacError, JoinPolicy};

/// One series column of an [`AlignedTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    id: SeriesId,
    availability: Availability,
    values: Vec<Option<f64>>,
}

impl Column {
    pub(crate) const fn new(
        id: SeriesId,
        availability: Availability,
        values: Vec<Option<f64>>,
    ) -> Self {
        Self {
            id,
            availability,
            values,
        }
    }

    /// Series label.
    #[must_use]
    pub const fn id(&self) -> &SeriesId {
        &self.id
    }

    /// Whether the source series carried data.
    #[must_use]
    pub const fn availability(&self) -> &Availability {
        &self.availability
    }

    /// Cells in row order.
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Number of present cells.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Series aligned on a shared first-of-month grid.
///
/// Rows are strictly increasing months; columns are ordered by id.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable {
    join: JoinPolicy,
    months: Vec<Month>,
    columns: Vec<Column>,
}

impl AlignedTable {
    pub(crate) const fn from_parts(join: JoinPolicy, months: Vec<Month>, columns: Vec<Column>) -> Self {
        Self {
            join,
            months,
            columns,
        }
    }

    /// Join policy the table was built with.
    #[must_use]
    pub const fn join(&self) -> JoinPolicy {
        self.join
    }

    /// Row labels.
    #[must_use]
    pub fn months(&self) -> &[Month] {
        &self.months
    }

    /// All columns in id order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column labels in id order.
    pub fn column_ids(&self) -> impl Iterator<Item = &SeriesId> + '_ {
        self.columns.iter().map(Column::id)
    }

    /// Look up a column by id.
    #[must_use]
    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns
            .binary_search_by(|c| c.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.columns[i])
    }

    /// Cell at (`month`, `id`); `None` when absent or either label is unknown.
    #[must_use]
    pub fn get(&self, month: Month, id: &str) -> Option<f64> {
        let row = self.months.binary_search(&month).ok()?;
        self.column(id)?.values[row]
    }

    /// One row as `(id, cell)` pairs, `None` when `month` is not a row.
    #[must_use]
    pub fn row(&self, month: Month) -> Option<Vec<(&SeriesId, Option<f64>)>> {
        let row = self.months.binary_search(&month).ok()?;
        Some(
            self.columns
                .iter()
                .map(|c| (&c.id, c.values[row]))
                .collect(),
        )
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// True if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Columns whose source was unavailable.
    pub fn missing_columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns
            .iter()
            .filter(|c| matches!(c.availability, Availability::Missing { .. }))
    }

    /// Split the table back into month-start series, one per column.
    #[must_use]
    pub fn into_series(self) -> Vec<Series> {
        let months = self.months;
        self.columns
            .into_iter()
            .map(|c| {
                Series::from_observations(
                    c.id,
                    months
                        .iter()
                        .zip(c.values)
                        .filter_map(|(m, v)| v.map(|v| (m.start_utc(), v))),
                )
            })
            .collect()
    }

    /// Write the table as comma-separated text.
    ///
    /// The header is `date` followed by the column ids; dates are
    /// `YYYY-MM-01` and absent cells are empty fields.
    ///
    /// # Errors
    /// Returns `Err(AlmanacError::Data)` if the writer fails.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), AlmanacError> {
        let mut w = csv::Writer::from_writer(writer);
        let header = std::iter::once("date").chain(self.columns.iter().map(|c| c.id.as_str()));
        w.write_record(header).map_err(csv_err)?;
        for (row, month) in self.months.iter().enumerate() {
            let mut record = Vec::with_capacity(self.columns.len() + 1);
            record.push(month.to_string());
            for c in &self.columns {
                record.push(c.values[row].map(|v| v.to_string()).unwrap_or_default());
            }
            w.write_record(&record).map_err(csv_err)?;
        }
        w.flush().map_err(|e| AlmanacError::Data(format!("csv write failed: {e}")))
    }

    /// Render the table as a CSV string.
    ///
    /// # Errors
    /// Returns `Err(AlmanacError::Data)` if encoding fails.
    pub fn to_csv_string(&self) -> Result<String, AlmanacError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| AlmanacError::Data(format!("csv output not utf-8: {e}")))
    }

    /// Convert to a polars `DataFrame` with a string `date` column.
    ///
    /// # Errors
    /// Returns `Err(AlmanacError::Data)` if polars rejects the columns.
    #[cfg(feature = "dataframe")]
    pub fn to_dataframe(&self) -> Result<polars::prelude::DataFrame, AlmanacError> {
        use polars::prelude::{DataFrame, NamedFrom};

        let dates: Vec<String> = self.months.iter().map(ToString::to_string).collect();
        let mut cols = Vec::with_capacity(self.columns.len() + 1);
        cols.push(polars::prelude::Column::new("date".into(), dates));
        for c in &self.columns {
            cols.push(polars::prelude::Column::new(
                c.id.as_str().into(),
                c.values.clone(),
            ));
        }
        DataFrame::new(cols).map_err(|e| AlmanacError::Data(format!("dataframe: {e}")))
    }
}

fn csv_err(e: csv::Error) -> AlmanacError {
    AlmanacError::Data(format!("csv write failed: {e}"))
}
