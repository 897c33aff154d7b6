//! almanac-fred
//!
//! `SeriesConnector` for the FRED observations endpoint of the Federal
//! Reserve Bank of St. Louis. Credentials come from an explicit
//! [`FredConfig`]; when the key is absent the connector either degrades to a
//! missing-series marker or fails, as chosen by
//! [`CredentialPolicy`](almanac_types::CredentialPolicy).
#![warn(missing_docs)]

mod config;
mod parse;

use almanac_core::{
    AlmanacError, ConnectorKey, Month, MonthRange, SeriesConnector, SeriesInput, SeriesRequest,
};
use almanac_types::CredentialPolicy;
use async_trait::async_trait;
use chrono::NaiveDate;

pub use config::{API_KEY_VAR, DEFAULT_BASE_URL, FredConfig};

/// Public connector type for FRED series.
pub struct FredConnector {
    cfg: FredConfig,
    http: reqwest::Client,
}

impl FredConnector {
    /// Static connector key for request routing.
    pub const KEY: ConnectorKey = ConnectorKey::new("almanac-fred");

    /// Build with a fresh HTTP client.
    #[must_use]
    pub fn new(cfg: FredConfig) -> Self {
        Self::with_client(cfg, reqwest::Client::new())
    }

    /// Build from an existing `reqwest::Client`.
    #[must_use]
    pub const fn with_client(cfg: FredConfig, http: reqwest::Client) -> Self {
        Self { cfg, http }
    }

    /// Build from [`FredConfig::from_env`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(FredConfig::from_env())
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &FredConfig {
        &self.cfg
    }

    fn missing_key(&self, req: &SeriesRequest) -> Result<SeriesInput, AlmanacError> {
        match self.cfg.on_missing_credential {
            CredentialPolicy::Degrade => {
                #[cfg(feature = "tracing")]
                tracing::warn!(series = %req.id, "no FRED API key; substituting missing series");
                Ok(SeriesInput::missing(
                    req.id.clone(),
                    format!("{API_KEY_VAR} is not configured"),
                ))
            }
            CredentialPolicy::Fail => Err(AlmanacError::missing_credential(
                Self::KEY.as_str(),
                API_KEY_VAR,
            )),
        }
    }

    fn query(key: &str, symbol: &str, window: Option<MonthRange>) -> Vec<(&'static str, String)> {
        let mut q = vec![
            ("series_id", symbol.to_string()),
            ("api_key", key.to_string()),
            ("file_type", "json".to_string()),
        ];
        if let Some(w) = window {
            q.push(("observation_start", w.start().first_day().to_string()));
            if let Some(end) = last_day(w.end()) {
                q.push(("observation_end", end.to_string()));
            }
        }
        q
    }

    fn normalize_status(status: reqwest::StatusCode, body: &str, symbol: &str) -> AlmanacError {
        let msg = serde_json::from_str::<parse::ErrorResponse>(body)
            .map(|e| e.error_message)
            .unwrap_or_else(|_| body.to_string());
        let looks_missing = msg.to_ascii_lowercase().contains("does not exist");
        if status == reqwest::StatusCode::NOT_FOUND || looks_missing {
            AlmanacError::not_found(format!("series {symbol}"))
        } else {
            AlmanacError::connector(Self::KEY.as_str(), format!("HTTP {status}: {msg}"))
        }
    }
}

fn last_day(month: Month) -> Option<NaiveDate> {
    month.succ()?.first_day().pred_opt()
}

fn http_err(e: &reqwest::Error) -> AlmanacError {
    AlmanacError::connector(FredConnector::KEY.as_str(), e.to_string())
}

#[async_trait]
impl SeriesConnector for FredConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "FRED"
    }

    async fn fetch(
        &self,
        req: &SeriesRequest,
        window: Option<MonthRange>,
    ) -> Result<SeriesInput, AlmanacError> {
        let Some(key) = self.cfg.api_key.as_deref() else {
            return self.missing_key(req);
        };
        let url = format!(
            "{}/series/observations",
            self.cfg.base_url.trim_end_matches('/')
        );
        #[cfg(feature = "tracing")]
        tracing::debug!(series = %req.id, symbol = %req.symbol, "fetching FRED observations");

        let resp = self
            .http
            .get(&url)
            .query(&Self::query(key, &req.symbol, window))
            .send()
            .await
            .map_err(|e| http_err(&e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| http_err(&e))?;
        if !status.is_success() {
            return Err(Self::normalize_status(status, &body, &req.symbol));
        }
        let parsed: parse::ObservationsResponse = serde_json::from_str(&body)
            .map_err(|e| AlmanacError::Data(format!("FRED payload for {}: {e}", req.symbol)))?;
        let series = parse::to_series(req.id.clone(), parsed)?;
        Ok(series.into())
    }
}
