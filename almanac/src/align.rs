use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use almanac_core::{
    AlignReport, AlmanacError, Cadence, ColumnReport, MonthRange, RegularSeries, SeriesId,
    SeriesInput, SeriesRequest, UnavailablePolicy, merge, native_cadence, resample,
    resample_within,
};

use crate::Almanac;
use crate::core::{AlignKey, tag_err};
use crate::util::join_with_deadline;

/// Builder for one fetch-resample-merge run.
pub struct AlignBuilder<'a> {
    pub(crate) almanac: &'a Almanac,
    pub(crate) requests: Vec<SeriesRequest>,
    pub(crate) window: Option<MonthRange>,
}

impl<'a> AlignBuilder<'a> {
    /// Create a new builder bound to an `Almanac` instance.
    #[must_use]
    pub const fn new(almanac: &'a Almanac) -> Self {
        Self {
            almanac,
            requests: Vec::new(),
            window: None,
        }
    }

    /// Replace the requested series.
    ///
    /// # Errors
    /// Returns `DuplicateSeries` if two requests share an id.
    pub fn series(mut self, requests: &[SeriesRequest]) -> Result<Self, AlmanacError> {
        let mut seen = HashSet::new();
        for req in requests {
            if !seen.insert(&req.id) {
                return Err(AlmanacError::DuplicateSeries {
                    id: req.id.to_string(),
                });
            }
        }
        self.requests = requests.to_vec();
        Ok(self)
    }

    /// Append one request.
    ///
    /// # Errors
    /// Returns `DuplicateSeries` if the id is already requested.
    pub fn add_series(mut self, req: SeriesRequest) -> Result<Self, AlmanacError> {
        if self.requests.iter().any(|r| r.id == req.id) {
            return Err(AlmanacError::DuplicateSeries {
                id: req.id.to_string(),
            });
        }
        self.requests.push(req);
        Ok(self)
    }

    /// Restrict the grid to `window`.
    ///
    /// Every column then spans exactly the window. Observations a connector
    /// returns from before the window still seed the forward fill of its
    /// first months.
    #[must_use]
    pub const fn window(mut self, window: MonthRange) -> Self {
        self.window = Some(window);
        self
    }

    /// Execute the run.
    ///
    /// Series are fetched concurrently. Each fetch is bounded by the provider
    /// timeout and the whole fan-out by the optional request deadline. With a
    /// result cache configured a repeated run within the TTL returns the same
    /// report, and concurrent identical runs compute it once. Reports degraded
    /// by a provider failure are returned but not kept; series the provider
    /// does not know (`NotFound`) do not count as a failure here.
    ///
    /// # Errors
    /// Returns `InvalidArg` when no series were requested, `RequestTimeout`
    /// when the deadline elapses, and under `UnavailablePolicy::Fail` the
    /// first provider error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "almanac::align::run",
            skip(self),
            fields(
                series = self.requests.len(),
                join = ?self.almanac.cfg.join_policy,
                window = ?self.window,
            ),
        )
    )]
    pub async fn run(self) -> Result<Arc<AlignReport>, AlmanacError> {
        if self.requests.is_empty() {
            return Err(AlmanacError::InvalidArg(
                "no series requested; add at least one via series(...) or add_series(...)"
                    .to_string(),
            ));
        }

        let Some(cache) = &self.almanac.cache else {
            return compute(self.almanac, &self.requests, self.window)
                .await
                .map(Arc::new);
        };

        let cfg = &self.almanac.cfg;
        let mut requests = self.requests.clone();
        requests.sort();
        let key = AlignKey {
            requests,
            window: self.window,
            join: cfg.join_policy,
            fill: cfg.fill_policy,
            unavailable: cfg.unavailable_policy,
        };
        let report = cache
            .get_or_try_compute(key.clone(), async {
                compute(self.almanac, &self.requests, self.window)
                    .await
                    .map(Arc::new)
            })
            .await?;
        // A provider outage must not outlive the run that saw it.
        if report.warnings.iter().any(AlmanacError::is_actionable) {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                warnings = report.warnings.len(),
                "degraded report; dropping it from the cache"
            );
            cache.invalidate(&key).await;
        }
        Ok(report)
    }
}

impl Almanac {
    /// Begin an alignment run.
    #[must_use]
    pub const fn align(&self) -> AlignBuilder<'_> {
        AlignBuilder::new(self)
    }

    async fn fetch_one(
        &self,
        req: &SeriesRequest,
        window: Option<MonthRange>,
    ) -> Result<SeriesInput, AlmanacError> {
        let Some(c) = self.connector(&req.provider) else {
            return Err(AlmanacError::UnknownProvider {
                provider: req.provider.as_str().to_string(),
            });
        };
        let name = c.name();
        Self::provider_call_with_timeout(
            name,
            req.id.as_str(),
            self.cfg.provider_timeout,
            c.fetch(req, window),
        )
        .await
        .map(|input| input.with_id(req.id.clone()))
        .map_err(|e| tag_err(name, e))
    }
}

struct Fetched {
    input: SeriesInput,
    cadence: Cadence,
    observations: usize,
}

impl Fetched {
    fn new(input: SeriesInput) -> Self {
        let (cadence, observations) = match &input {
            SeriesInput::Observed(s) => (native_cadence(s), s.finite().count()),
            SeriesInput::Missing(_) => (Cadence::Unknown, 0),
        };
        Self {
            input,
            cadence,
            observations,
        }
    }
}

async fn compute(
    almanac: &Almanac,
    requests: &[SeriesRequest],
    window: Option<MonthRange>,
) -> Result<AlignReport, AlmanacError> {
    let cfg = &almanac.cfg;
    let tasks = requests.iter().map(|req| async move {
        let res = almanac.fetch_one(req, window).await;
        (req, res)
    });
    let joined = join_with_deadline(tasks, cfg.request_timeout, "align").await?;

    let mut warnings: Vec<AlmanacError> = Vec::new();
    let mut fetched: Vec<(&SeriesRequest, Fetched)> = Vec::with_capacity(joined.len());
    for (req, res) in joined {
        let input = match res {
            Ok(input) => input,
            Err(e) => match cfg.unavailable_policy {
                UnavailablePolicy::Fail => return Err(e),
                UnavailablePolicy::MarkMissing => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(series = %req.id, error = %e, "series unavailable; marking missing");
                    let input = SeriesInput::missing(req.id.clone(), e.to_string());
                    warnings.push(e);
                    input
                }
            },
        };
        #[cfg(feature = "tracing")]
        {
            if let SeriesInput::Missing(m) = &input {
                tracing::debug!(series = %m.id, reason = %m.reason, "missing series");
            }
        }
        fetched.push((req, Fetched::new(input)));
    }

    let mut regular: Vec<RegularSeries> = Vec::with_capacity(fetched.len());
    for (_, f) in &fetched {
        let r = match window {
            Some(w) => resample_within(&f.input, cfg.frequency, cfg.fill_policy, w)?,
            None => resample(&f.input, cfg.frequency, cfg.fill_policy)?,
        };
        regular.push(r);
    }
    let table = merge(regular, cfg.join_policy)?;

    let mut by_id: BTreeMap<SeriesId, ColumnReport> = fetched
        .into_iter()
        .map(|(req, f)| {
            let present_cells = table
                .column(req.id.as_str())
                .map_or(0, almanac_core::Column::present_count);
            let availability = table
                .column(req.id.as_str())
                .map(|c| c.availability().clone())
                .unwrap_or(almanac_core::Availability::Empty);
            #[cfg(feature = "tracing")]
            tracing::debug!(
                series = %req.id,
                cadence = ?f.cadence,
                observations = f.observations,
                present_cells,
                "aligned series"
            );
            let report = ColumnReport {
                id: req.id.clone(),
                provider: req.provider.as_str().to_string(),
                symbol: req.symbol.clone(),
                availability,
                cadence: f.cadence,
                observations: f.observations,
                present_cells,
            };
            (req.id.clone(), report)
        })
        .collect();
    let columns = table
        .column_ids()
        .filter_map(|id| by_id.remove(id))
        .collect();

    Ok(AlignReport {
        table,
        columns,
        warnings,
    })
}
