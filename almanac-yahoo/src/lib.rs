//! almanac-yahoo
//!
//! `SeriesConnector` over the Yahoo Finance v8 chart endpoint. Every fetch
//! asks for monthly bars (`interval=1mo`) and keeps the close; the exchange
//! timezone is attached so month-start bars stamped late on the previous UTC
//! day still land in the right month.
#![warn(missing_docs)]

mod chart;

use almanac_core::{
    AlmanacError, ConnectorKey, MonthRange, SeriesConnector, SeriesInput, SeriesRequest,
};
use async_trait::async_trait;

/// Default chart API root.
pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Public connector type for Yahoo Finance monthly closes.
pub struct YahooConnector {
    base_url: String,
    http: reqwest::Client,
    // Set only when the client itself carries no user agent.
    user_agent: Option<&'static str>,
}

impl Default for YahooConnector {
    fn default() -> Self {
        Self::new_default()
    }
}

impl YahooConnector {
    /// Static connector key for request routing.
    pub const KEY: ConnectorKey = ConnectorKey::new("almanac-yahoo");

    /// Build against the public endpoint with a fresh HTTP client.
    #[must_use]
    pub fn new_default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Build against another API root (tests, proxies).
    ///
    /// Falls back to a plain client when the configured one cannot be built;
    /// the browser user agent is then sent on each request instead.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        match http_client(USER_AGENT) {
            Ok(http) => Self::with_client(base_url, http),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %_e, "Yahoo HTTP client build failed; using a plain client");
                Self {
                    base_url,
                    http: reqwest::Client::new(),
                    user_agent: Some(USER_AGENT),
                }
            }
        }
    }

    /// Build against another API root, surfacing a client build failure.
    ///
    /// # Errors
    /// Returns a `Connector` error when the HTTP client cannot be configured.
    pub fn try_with_base_url(base_url: impl Into<String>) -> Result<Self, AlmanacError> {
        Ok(Self::with_client(base_url, http_client(USER_AGENT)?))
    }

    /// Build from an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
            user_agent: None,
        }
    }

    fn query(window: Option<MonthRange>) -> Vec<(&'static str, String)> {
        let mut q = vec![("interval", "1mo".to_string())];
        match window {
            Some(w) => {
                q.push(("period1", w.start().start_utc().timestamp().to_string()));
                let end = w.end().succ().unwrap_or_else(|| w.end());
                q.push(("period2", end.start_utc().timestamp().to_string()));
            }
            None => q.push(("range", "max".to_string())),
        }
        q
    }

    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("not found") || m.contains("no data") || m.contains("delisted")
    }

    fn normalize_error(code: &str, description: &str, symbol: &str) -> AlmanacError {
        if Self::looks_like_not_found(code) || Self::looks_like_not_found(description) {
            AlmanacError::not_found(format!("symbol {symbol}"))
        } else {
            AlmanacError::connector(Self::KEY.as_str(), format!("{code}: {description}"))
        }
    }
}

fn http_client(user_agent: &str) -> Result<reqwest::Client, AlmanacError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| http_err(&e))
}

fn http_err(e: &reqwest::Error) -> AlmanacError {
    AlmanacError::connector(YahooConnector::KEY.as_str(), e.to_string())
}

#[async_trait]
impl SeriesConnector for YahooConnector {
    fn name(&self) -> &'static str {
        Self::KEY.as_str()
    }

    fn vendor(&self) -> &'static str {
        "Yahoo"
    }

    async fn fetch(
        &self,
        req: &SeriesRequest,
        window: Option<MonthRange>,
    ) -> Result<SeriesInput, AlmanacError> {
        let url = format!(
            "{}/v8/finance/chart/{}",
            self.base_url.trim_end_matches('/'),
            req.symbol
        );
        #[cfg(feature = "tracing")]
        tracing::debug!(series = %req.id, symbol = %req.symbol, "fetching Yahoo chart");

        let mut get = self.http.get(&url).query(&Self::query(window));
        if let Some(ua) = self.user_agent {
            get = get.header(reqwest::header::USER_AGENT, ua);
        }
        let resp = get
            .send()
            .await
            .map_err(|e| http_err(&e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| http_err(&e))?;

        let envelope: chart::ChartEnvelope = match serde_json::from_str(&body) {
            Ok(env) => env,
            Err(_) if status == reqwest::StatusCode::NOT_FOUND => {
                return Err(AlmanacError::not_found(format!("symbol {}", req.symbol)));
            }
            Err(_) if !status.is_success() => {
                return Err(AlmanacError::connector(
                    Self::KEY.as_str(),
                    format!("HTTP {status}"),
                ));
            }
            Err(e) => {
                return Err(AlmanacError::Data(format!(
                    "chart payload for {}: {e}",
                    req.symbol
                )));
            }
        };
        if let Some(err) = envelope.chart.error {
            return Err(Self::normalize_error(&err.code, &err.description, &req.symbol));
        }
        let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
            return Err(AlmanacError::not_found(format!("symbol {}", req.symbol)));
        };
        let series = chart::to_series(req.id.clone(), result)?;
        Ok(series.into())
    }
}
