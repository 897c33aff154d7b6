use almanac_core::{AlmanacError, Series, SeriesId};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ObservationsResponse {
    pub(crate) observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Observation {
    pub(crate) date: String,
    pub(crate) value: String,
}

/// FRED error payload, e.g. `{"error_code":400,"error_message":"Bad Request. ..."}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error_message: String,
}

/// Convert observations into a series; `"."` marks a missing value and is skipped.
///
/// Any other value that is not a number fails the whole payload.
pub(crate) fn to_series(id: SeriesId, resp: ObservationsResponse) -> Result<Series, AlmanacError> {
    let mut series = Series::new(id);
    for obs in resp.observations {
        let value = obs.value.trim();
        if value == "." {
            continue;
        }
        let value = value.parse::<f64>().map_err(|e| {
            AlmanacError::Data(format!(
                "bad FRED value '{value}' for {} on {}: {e}",
                series.id(),
                obs.date
            ))
        })?;
        let date = NaiveDate::parse_from_str(&obs.date, "%Y-%m-%d")
            .map_err(|e| AlmanacError::Data(format!("bad FRED date '{}': {e}", obs.date)))?;
        series.insert(date.and_time(chrono::NaiveTime::MIN).and_utc(), value);
    }
    Ok(series)
}
