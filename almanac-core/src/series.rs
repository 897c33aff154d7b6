//! Named series, the explicit missing-series marker, and month-regular series.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::month::{Month, MonthRange};
use crate::FillPolicy;

/// Label identifying a series, e.g. `"USDCHF"` or `"US_CPI"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(String);

impl SeriesId {
    /// Wrap a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Borrow the label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SeriesId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for SeriesId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A named, irregularly sampled series of real-valued observations.
///
/// Timestamps are UTC instants. The optional timezone decides which local
/// calendar month an instant belongs to (a London month-start close stamped
/// `23:00Z` on the previous day still belongs to the new month).
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    id: SeriesId,
    tz: Option<Tz>,
    observations: BTreeMap<DateTime<Utc>, f64>,
}

impl Series {
    /// An empty series.
    pub fn new(id: impl Into<SeriesId>) -> Self {
        Self {
            id: id.into(),
            tz: None,
            observations: BTreeMap::new(),
        }
    }

    /// Build from `(timestamp, value)` pairs; a repeated timestamp keeps the later pair.
    pub fn from_observations<I>(id: impl Into<SeriesId>, observations: I) -> Self
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        Self {
            id: id.into(),
            tz: None,
            observations: observations.into_iter().collect(),
        }
    }

    /// Attach the timezone used for month bucketing.
    #[must_use]
    pub const fn with_timezone(mut self, tz: Tz) -> Self {
        self.tz = Some(tz);
        self
    }

    /// Insert or replace one observation, returning the previous value.
    pub fn insert(&mut self, ts: DateTime<Utc>, value: f64) -> Option<f64> {
        self.observations.insert(ts, value)
    }

    /// Series label.
    #[must_use]
    pub const fn id(&self) -> &SeriesId {
        &self.id
    }

    /// Timezone used for month bucketing, if any.
    #[must_use]
    pub const fn timezone(&self) -> Option<Tz> {
        self.tz
    }

    /// Observations in timestamp order.
    #[must_use]
    pub const fn observations(&self) -> &BTreeMap<DateTime<Utc>, f64> {
        &self.observations
    }

    /// Number of observations, including non-finite ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// True if the series holds no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Iterate finite observations in timestamp order.
    pub fn finite(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.observations
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(ts, v)| (*ts, *v))
    }
}

/// Explicit marker for a series that could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingSeries {
    /// Label of the series that is absent.
    pub id: SeriesId,
    /// Why it is absent (no credential, provider outage, ...).
    pub reason: String,
}

/// Either an observed series or an explicit missing marker.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesInput {
    /// Data as delivered by a provider (possibly empty).
    Observed(Series),
    /// The provider could not deliver this series.
    Missing(MissingSeries),
}

impl SeriesInput {
    /// Build a missing marker.
    pub fn missing(id: impl Into<SeriesId>, reason: impl Into<String>) -> Self {
        Self::Missing(MissingSeries {
            id: id.into(),
            reason: reason.into(),
        })
    }

    /// Label of the series, observed or not.
    #[must_use]
    pub const fn id(&self) -> &SeriesId {
        match self {
            Self::Observed(s) => s.id(),
            Self::Missing(m) => &m.id,
        }
    }

    /// True for the missing marker.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }

    /// Relabel the input, keeping its data.
    #[must_use]
    pub fn with_id(self, id: SeriesId) -> Self {
        match self {
            Self::Observed(mut s) => {
                s.id = id;
                Self::Observed(s)
            }
            Self::Missing(mut m) => {
                m.id = id;
                Self::Missing(m)
            }
        }
    }
}

impl From<Series> for SeriesInput {
    fn from(s: Series) -> Self {
        Self::Observed(s)
    }
}

impl From<MissingSeries> for SeriesInput {
    fn from(m: MissingSeries) -> Self {
        Self::Missing(m)
    }
}

/// Whether a regular series carries data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Availability {
    /// At least one month holds a value.
    Observed,
    /// The source delivered no usable observation.
    Empty,
    /// The source was unavailable.
    Missing {
        /// Reason reported with the missing marker.
        reason: String,
    },
}

impl Availability {
    /// True when the series holds data.
    #[must_use]
    pub const fn is_observed(&self) -> bool {
        matches!(self, Self::Observed)
    }
}

/// A series reindexed onto a gapless monthly grid.
///
/// Every month of the span has an entry; `None` marks an absent cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RegularSeries {
    id: SeriesId,
    fill: FillPolicy,
    availability: Availability,
    values: BTreeMap<Month, Option<f64>>,
}

impl RegularSeries {
    pub(crate) fn from_parts(
        id: SeriesId,
        fill: FillPolicy,
        availability: Availability,
        values: BTreeMap<Month, Option<f64>>,
    ) -> Self {
        Self {
            id,
            fill,
            availability,
            values,
        }
    }

    /// Series label.
    #[must_use]
    pub const fn id(&self) -> &SeriesId {
        &self.id
    }

    /// Fill policy the series was resampled with.
    #[must_use]
    pub const fn fill(&self) -> FillPolicy {
        self.fill
    }

    /// Whether the series carries data.
    #[must_use]
    pub const fn availability(&self) -> &Availability {
        &self.availability
    }

    /// Month-to-optional-value mapping in month order.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<Month, Option<f64>> {
        &self.values
    }

    /// Grid covered by this series, `None` when empty.
    #[must_use]
    pub fn span(&self) -> Option<MonthRange> {
        let (first, _) = self.values.first_key_value()?;
        let (last, _) = self.values.last_key_value()?;
        MonthRange::new(*first, *last).ok()
    }

    /// Value at `month`, `None` when absent or outside the span.
    #[must_use]
    pub fn get(&self, month: Month) -> Option<f64> {
        self.values.get(&month).copied().flatten()
    }

    /// Months holding a value.
    pub fn present_months(&self) -> impl Iterator<Item = Month> + '_ {
        self.values
            .iter()
            .filter_map(|(m, v)| v.is_some().then_some(*m))
    }

    /// Value in the last month of the span.
    #[must_use]
    pub fn tail_value(&self) -> Option<f64> {
        self.values.last_key_value().and_then(|(_, v)| *v)
    }

    /// True if the span is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Month-start observations of the present cells.
    #[must_use]
    pub fn to_series(&self) -> Series {
        Series::from_observations(
            self.id.clone(),
            self.values
                .iter()
                .filter_map(|(m, v)| v.map(|v| (m.start_utc(), v))),
        )
    }
}
