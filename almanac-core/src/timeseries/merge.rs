use std::collections::{BTreeMap, BTreeSet, btree_map::Entry};

use crate::month::{Month, MonthRange};
use crate::series::{RegularSeries, SeriesId};
use crate::table::{AlignedTable, Column};
use crate::{AlmanacError, FillPolicy, JoinPolicy};

/// Index the inputs by id; a repeated id is rejected.
fn collect_unique<I>(series: I) -> Result<BTreeMap<SeriesId, RegularSeries>, AlmanacError>
where
    I: IntoIterator<Item = RegularSeries>,
{
    let mut by_id = BTreeMap::new();
    for s in series {
        match by_id.entry(s.id().clone()) {
            Entry::Vacant(v) => {
                v.insert(s);
            }
            Entry::Occupied(o) => {
                return Err(AlmanacError::DuplicateSeries {
                    id: o.key().to_string(),
                });
            }
        }
    }
    Ok(by_id)
}

fn outer_months(by_id: &BTreeMap<SeriesId, RegularSeries>) -> Vec<Month> {
    by_id
        .values()
        .filter_map(RegularSeries::span)
        .reduce(|acc, r| acc.span(&r))
        .map(|grid| grid.iter().collect())
        .unwrap_or_default()
}

fn inner_months(by_id: &BTreeMap<SeriesId, RegularSeries>) -> Vec<Month> {
    let mut constraining = by_id.values().filter(|s| s.availability().is_observed());
    let Some(first) = constraining.next() else {
        return Vec::new();
    };
    let mut common: BTreeSet<Month> = first.present_months().collect();
    for s in constraining {
        let present: BTreeSet<Month> = s.present_months().collect();
        common.retain(|m| present.contains(m));
    }
    common.into_iter().collect()
}

/// Value of `series` at `month` on the outer grid.
///
/// Before the series' span the cell is absent. After it, a `LastObserved`
/// series carries its final value.
fn outer_cell(series: &RegularSeries, span: Option<MonthRange>, month: Month) -> Option<f64> {
    let span = span?;
    if span.contains(month) {
        return series.get(month);
    }
    match series.fill() {
        FillPolicy::LastObserved if month > span.end() => series.tail_value(),
        FillPolicy::LastObserved | FillPolicy::None => None,
    }
}

/// Combine resampled series into one aligned table.
///
/// - [`JoinPolicy::Outer`]: rows cover the contiguous month span of every
///   input grid. Cells before a series' first month are absent; after its
///   last month a `LastObserved` series carries its final value.
/// - [`JoinPolicy::Inner`]: rows are the months where every observed series
///   holds a value. Empty and missing series do not constrain the rows and
///   keep an all-absent column.
///
/// Columns are ordered by id, so the result does not depend on input order.
///
/// # Errors
/// Returns `Err(AlmanacError::DuplicateSeries)` if two inputs share an id.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "almanac_core::timeseries::merge::merge",
        skip(series),
        err,
    ),
)]
pub fn merge<I>(series: I, join: JoinPolicy) -> Result<AlignedTable, AlmanacError>
where
    I: IntoIterator<Item = RegularSeries>,
{
    let by_id = collect_unique(series)?;
    let months = match join {
        JoinPolicy::Outer => outer_months(&by_id),
        JoinPolicy::Inner => inner_months(&by_id),
    };

    let columns = by_id
        .into_values()
        .map(|s| {
            let span = s.span();
            let values = months
                .iter()
                .map(|m| match join {
                    JoinPolicy::Outer => outer_cell(&s, span, *m),
                    JoinPolicy::Inner => s.get(*m),
                })
                .collect();
            Column::new(s.id().clone(), s.availability().clone(), values)
        })
        .collect::<Vec<_>>();

    #[cfg(feature = "tracing")]
    tracing::debug!(
        rows = months.len(),
        columns = columns.len(),
        "merged series into aligned table"
    );

    Ok(AlignedTable::from_parts(join, months, columns))
}
