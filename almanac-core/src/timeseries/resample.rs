use std::collections::BTreeMap;

use crate::month::{Month, MonthRange};
use crate::series::{Availability, RegularSeries, Series, SeriesInput};
use crate::{AlmanacError, FillPolicy, Frequency};

/// Group finite observations by local calendar month; the temporally last
/// observation of each month wins.
fn bucket_by_month(series: &Series) -> BTreeMap<Month, f64> {
    let tz = series.timezone();
    let mut buckets = BTreeMap::new();
    // `finite()` yields in timestamp order, so later inserts overwrite earlier ones.
    for (ts, value) in series.finite() {
        buckets.insert(Month::of_datetime(ts, tz), value);
    }
    buckets
}

fn fill_grid(
    buckets: &BTreeMap<Month, f64>,
    grid: MonthRange,
    fill: FillPolicy,
) -> BTreeMap<Month, Option<f64>> {
    let mut carry = match fill {
        FillPolicy::LastObserved => buckets.range(..grid.start()).next_back().map(|(_, v)| *v),
        FillPolicy::None => None,
    };
    grid.iter()
        .map(|month| {
            let value = match (buckets.get(&month), fill) {
                (Some(v), FillPolicy::LastObserved) => {
                    carry = Some(*v);
                    carry
                }
                (Some(v), FillPolicy::None) => Some(*v),
                (None, FillPolicy::LastObserved) => carry,
                (None, FillPolicy::None) => None,
            };
            (month, value)
        })
        .collect()
}

/// Every month of `grid` with an absent cell.
fn absent_grid(grid: MonthRange) -> BTreeMap<Month, Option<f64>> {
    grid.iter().map(|month| (month, None)).collect()
}

fn resample_on(
    input: &SeriesInput,
    frequency: Frequency,
    fill: FillPolicy,
    window: Option<MonthRange>,
) -> Result<RegularSeries, AlmanacError> {
    let Frequency::Monthly = frequency;
    let series = match input {
        SeriesInput::Missing(m) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(series = %m.id, reason = %m.reason, "resampling missing series");
            let values = window.map(absent_grid).unwrap_or_default();
            return Ok(RegularSeries::from_parts(
                m.id.clone(),
                fill,
                Availability::Missing {
                    reason: m.reason.clone(),
                },
                values,
            ));
        }
        SeriesInput::Observed(s) => s,
    };

    let buckets = bucket_by_month(series);
    let (Some((first, _)), Some((last, _))) = (buckets.first_key_value(), buckets.last_key_value())
    else {
        let values = window.map(absent_grid).unwrap_or_default();
        return Ok(RegularSeries::from_parts(
            series.id().clone(),
            fill,
            Availability::Empty,
            values,
        ));
    };
    let grid = match window {
        Some(w) => w,
        None => MonthRange::new(*first, *last)?,
    };

    let values = fill_grid(&buckets, grid, fill);
    let availability = if values.values().any(Option::is_some) {
        Availability::Observed
    } else {
        Availability::Empty
    };
    Ok(RegularSeries::from_parts(
        series.id().clone(),
        fill,
        availability,
        values,
    ))
}

/// Reindex a series onto the first-of-month grid spanning its first to last
/// observed month.
///
/// Within a month the temporally last finite observation wins. Under
/// [`FillPolicy::LastObserved`] a month without observations takes the last
/// value from an earlier month; under [`FillPolicy::None`] it stays absent.
/// Non-finite values are ignored.
///
/// A series with no finite observation resamples to an empty series with
/// [`Availability::Empty`]; a missing marker resamples to an empty series
/// with [`Availability::Missing`].
///
/// # Errors
/// Returns an error only if the month span cannot be represented.
///
/// # Examples
///
/// ```
/// use almanac_core::{resample, FillPolicy, Frequency, Month, Series, SeriesInput};
///
/// let jan = "2020-01".parse::<Month>().unwrap();
/// let mar = "2020-03".parse::<Month>().unwrap();
/// let s = Series::from_observations("A", [(jan.start_utc(), 1.0), (mar.start_utc(), 3.0)]);
/// let r = resample(&SeriesInput::from(s), Frequency::Monthly, FillPolicy::LastObserved).unwrap();
/// assert_eq!(r.get("2020-02".parse().unwrap()), Some(1.0));
/// ```
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "almanac_core::timeseries::resample::resample",
        skip(input),
        fields(series = %input.id()),
        err,
    ),
)]
pub fn resample(
    input: &SeriesInput,
    frequency: Frequency,
    fill: FillPolicy,
) -> Result<RegularSeries, AlmanacError> {
    resample_on(input, frequency, fill, None)
}

/// Reindex a series onto exactly `window`.
///
/// Observations before the window still seed the carried value under
/// [`FillPolicy::LastObserved`]; observations after it are ignored. Empty
/// and missing inputs also cover the window, with every cell absent.
///
/// # Errors
/// Returns an error only if the month span cannot be represented.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "almanac_core::timeseries::resample::resample_within",
        skip(input),
        fields(series = %input.id(), window = %window),
        err,
    ),
)]
pub fn resample_within(
    input: &SeriesInput,
    frequency: Frequency,
    fill: FillPolicy,
    window: MonthRange,
) -> Result<RegularSeries, AlmanacError> {
    resample_on(input, frequency, fill, Some(window))
}
