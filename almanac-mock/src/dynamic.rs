use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use almanac_core::{AlmanacError, MonthRange, Series, SeriesConnector, SeriesInput, SeriesRequest};

/// Instruction for how `fetch` should behave for a given symbol.
#[derive(Clone)]
pub enum MockBehavior {
    /// Return the provided series (clipped to the window, relabelled to the request id).
    Return(Series),
    /// Fail immediately with the provided error.
    Fail(AlmanacError),
    /// Return a missing-series marker with the given reason.
    Missing(String),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<String, MockBehavior>,
    calls: HashMap<String, usize>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior of `fetch` for a specific symbol.
    pub async fn set_behavior(&self, symbol: impl Into<String>, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(symbol.into(), behavior);
    }

    /// Number of `fetch` calls seen for `symbol`.
    pub async fn calls(&self, symbol: &str) -> usize {
        let guard = self.state.lock().await;
        guard.calls.get(symbol).copied().unwrap_or(0)
    }

    /// Number of `fetch` calls seen across all symbols.
    pub async fn total_calls(&self) -> usize {
        let guard = self.state.lock().await;
        guard.calls.values().sum()
    }

    /// Clear all configured behaviors and call counters.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.calls.clear();
    }
}

/// A connector that defers all behavior to an external controller.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn SeriesConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn SeriesConnector>, controller)
    }
}

#[async_trait]
impl SeriesConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    async fn fetch(
        &self,
        req: &SeriesRequest,
        window: Option<MonthRange>,
    ) -> Result<SeriesInput, AlmanacError> {
        // Snapshot the behavior without holding the lock across await points
        let behavior = {
            let mut guard = self.state.lock().await;
            *guard.calls.entry(req.symbol.clone()).or_insert(0) += 1;
            guard.rules.get(&req.symbol).cloned()
        };

        match behavior {
            Some(MockBehavior::Return(s)) => {
                Ok(SeriesInput::from(crate::clip(s, window)).with_id(req.id.clone()))
            }
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Missing(reason)) => {
                Ok(SeriesInput::missing(req.id.clone(), reason))
            }
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                Err(AlmanacError::Other("pending future resolved".into()))
            }
            None => Err(AlmanacError::not_found(format!("series {}", req.symbol))),
        }
    }
}
