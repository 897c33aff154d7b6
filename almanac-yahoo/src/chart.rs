//! Wire types of the v8 chart endpoint.

use almanac_core::{AlmanacError, Series, SeriesId};
use chrono::DateTime;
use chrono_tz::Tz;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ChartEnvelope {
    pub(crate) chart: Chart,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Chart {
    pub(crate) result: Option<Vec<ChartResult>>,
    pub(crate) error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartError {
    pub(crate) code: String,
    #[serde(default)]
    pub(crate) description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResult {
    pub(crate) meta: Meta,
    #[serde(default)]
    pub(crate) timestamp: Vec<i64>,
    pub(crate) indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Meta {
    pub(crate) exchange_timezone_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Indicators {
    #[serde(default)]
    pub(crate) quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuoteBlock {
    #[serde(default)]
    pub(crate) close: Vec<Option<f64>>,
}

/// Turn a chart result into a series of closes; null closes are skipped.
///
/// The exchange timezone, when recognised, is attached for month bucketing.
pub(crate) fn to_series(id: SeriesId, result: ChartResult) -> Result<Series, AlmanacError> {
    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();
    if closes.len() != result.timestamp.len() {
        return Err(AlmanacError::Data(format!(
            "chart for {id}: {} timestamps but {} closes",
            result.timestamp.len(),
            closes.len()
        )));
    }

    let mut series = Series::new(id);
    for (ts, close) in result.timestamp.into_iter().zip(closes) {
        let Some(close) = close else {
            continue;
        };
        let ts = DateTime::from_timestamp(ts, 0)
            .ok_or_else(|| AlmanacError::Data(format!("timestamp out of range: {ts}")))?;
        series.insert(ts, close);
    }
    let tz = result
        .meta
        .exchange_timezone_name
        .as_deref()
        .and_then(|name| name.parse::<Tz>().ok());
    Ok(match tz {
        Some(tz) => series.with_timezone(tz),
        None => series,
    })
}
