//! Calendar-month grid primitives.
//!
//! A [`Month`] is labelled by its first day (`YYYY-MM-01`). A [`MonthRange`]
//! is an inclusive, gapless run of months with a fixed one-month step.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::AlmanacError;

/// A calendar month, canonically the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(NaiveDate);

impl Month {
    /// Build a month from a year and a 1-based month number.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `month` is outside `1..=12` or the year is out of range.
    pub fn new(year: i32, month: u32) -> Result<Self, AlmanacError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or_else(|| AlmanacError::InvalidArg(format!("invalid month: {year}-{month:02}")))
    }

    /// The month containing `date`.
    #[must_use]
    pub fn of_date(date: NaiveDate) -> Self {
        // Day 1 always exists for any representable date's year/month.
        Self(date.with_day(1).unwrap_or(date))
    }

    /// The month containing `ts`, read as a local date in `tz` (UTC when `None`).
    #[must_use]
    pub fn of_datetime(ts: DateTime<Utc>, tz: Option<Tz>) -> Self {
        match tz {
            Some(tz) => Self::of_date(ts.with_timezone(&tz).date_naive()),
            None => Self::of_date(ts.date_naive()),
        }
    }

    /// Calendar year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// 1-based month number.
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Midnight UTC on the first day of the month.
    #[must_use]
    pub fn start_utc(self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc()
    }

    /// The following month, or `None` at the end of the representable calendar.
    #[must_use]
    pub fn succ(self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// The preceding month, or `None` at the start of the representable calendar.
    #[must_use]
    pub fn pred(self) -> Option<Self> {
        self.0.checked_sub_months(Months::new(1)).map(Self)
    }

    /// Signed number of month steps from `self` to `other`.
    #[must_use]
    pub fn months_until(self, other: Self) -> i64 {
        let years = i64::from(other.year()) - i64::from(self.year());
        years * 12 + i64::from(other.month()) - i64::from(self.month())
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Month {
    type Err = AlmanacError;

    /// Accepts `YYYY-MM` or any `YYYY-MM-DD` date inside the month.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d"))
            .map(Self::of_date)
            .map_err(|_| AlmanacError::InvalidArg(format!("cannot parse month from '{s}'")))
    }
}

impl TryFrom<String> for Month {
    type Error = AlmanacError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Month> for String {
    fn from(m: Month) -> Self {
        m.to_string()
    }
}

/// Inclusive range of months `[start, end]` with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MonthRange {
    start: Month,
    end: Month,
}

impl MonthRange {
    /// Build a range from its first and last month.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `start` is after `end`.
    pub fn new(start: Month, end: Month) -> Result<Self, AlmanacError> {
        if start > end {
            return Err(AlmanacError::InvalidArg(format!(
                "month range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// A range holding exactly one month.
    #[must_use]
    pub const fn single(month: Month) -> Self {
        Self {
            start: month,
            end: month,
        }
    }

    /// First month (inclusive).
    #[must_use]
    pub const fn start(&self) -> Month {
        self.start
    }

    /// Last month (inclusive).
    #[must_use]
    pub const fn end(&self) -> Month {
        self.end
    }

    /// Number of months in the range; always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.start.months_until(self.end) + 1).unwrap_or(usize::MAX)
    }

    /// Always false; a range holds at least one month.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// True if `month` lies within the range.
    #[must_use]
    pub fn contains(&self, month: Month) -> bool {
        self.start <= month && month <= self.end
    }

    /// Overlap of two ranges, if any.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Self { start, end })
    }

    /// Smallest range covering both.
    #[must_use]
    pub fn span(&self, other: &Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Iterate the months of the range in increasing order.
    #[must_use]
    pub const fn iter(&self) -> MonthIter {
        MonthIter {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for MonthRange {
    type Item = Month;
    type IntoIter = MonthIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for MonthRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Iterator over a [`MonthRange`].
#[derive(Debug, Clone)]
pub struct MonthIter {
    next: Option<Month>,
    end: Month,
}

impl Iterator for MonthIter {
    type Item = Month;

    fn next(&mut self) -> Option<Month> {
        let cur = self.next.filter(|m| *m <= self.end)?;
        self.next = cur.succ();
        Some(cur)
    }
}
