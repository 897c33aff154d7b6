use chrono::TimeDelta;
use serde::Serialize;

use crate::series::Series;

/// Native sampling cadence of a source series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    /// Typical step shorter than four weeks (daily or weekly quotes).
    SubMonthly,
    /// Typical step of one calendar month.
    Monthly,
    /// Typical step of one calendar quarter.
    Quarterly,
    /// Any longer or irregular step.
    Sparse,
    /// Fewer than two distinct timestamps.
    Unknown,
}

/// Estimate a representative step (in whole days) from positive adjacent
/// deltas between finite observations.
///
/// Prefer the mode (most frequent positive delta); if there is no unique mode,
/// return the lower median.
///
/// ```
/// use almanac_core::{estimate_step_days, Series};
/// use chrono::{DateTime, Utc};
///
/// fn day(n: i64) -> DateTime<Utc> { DateTime::from_timestamp(n * 86_400, 0).unwrap() }
/// // Deltas 1,1,1,3 => mode is 1
/// let s = Series::from_observations("X", [0, 1, 2, 3, 6].map(|d| (day(d), 1.0)));
/// assert_eq!(estimate_step_days(&s), Some(1));
/// ```
///
/// Returns `None` if fewer than two finite observations are present.
#[must_use]
pub fn estimate_step_days(series: &Series) -> Option<i64> {
    let mut deltas: Vec<i64> = series
        .finite()
        .map(|(ts, _)| ts)
        .collect::<Vec<_>>()
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|dt| *dt > TimeDelta::zero())
        .map(|dt| dt.num_days())
        .collect();
    if deltas.is_empty() {
        return None;
    }
    deltas.sort_unstable();

    let mut runs: Vec<(i64, usize)> = Vec::new();
    for d in &deltas {
        match runs.last_mut() {
            Some((v, n)) if v == d => *n += 1,
            _ => runs.push((*d, 1)),
        }
    }
    let best = runs.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let mut modes = runs.iter().filter(|(_, n)| *n == best);
    if let (Some((mode, _)), None) = (modes.next(), modes.next()) {
        return Some(*mode);
    }

    // Lower median
    let mid = deltas.len() / 2;
    if deltas.len() % 2 == 1 {
        Some(deltas[mid])
    } else {
        Some(deltas[mid - 1])
    }
}

/// Classify the native cadence of a series from its typical step.
#[must_use]
pub fn native_cadence(series: &Series) -> Cadence {
    match estimate_step_days(series) {
        None => Cadence::Unknown,
        Some(d) if d < 28 => Cadence::SubMonthly,
        Some(28..=31) => Cadence::Monthly,
        Some(89..=92) => Cadence::Quarterly,
        Some(_) => Cadence::Sparse,
    }
}
