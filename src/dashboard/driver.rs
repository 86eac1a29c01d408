//! Async glue between [`Dashboard`] transitions and an [`AdvisorSource`].
//!
//! The state lives behind a `tokio` mutex that is never held across a remote
//! call: a transition is taken under the lock, the request runs unlocked, and
//! the outcome is applied under the lock again. Tags on each request keep a
//! slow, superseded fetch from overwriting newer results.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use crate::dashboard::accumulator::PageRequest;
use crate::dashboard::resolver::CascadeRequest;
use crate::dashboard::{Dashboard, DashboardError, composer, resolver};
use crate::domain::advisor::SortColumn;
use crate::domain::facet::{Facet, FacetSelection};
use crate::dto::dashboard::DashboardView;
use crate::repository::source::AdvisorSource;

/// Quiet period after the last keystroke before a search campaign starts.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct DashboardDriver<S> {
    dashboard: Arc<Mutex<Dashboard>>,
    source: S,
    search_tick: Arc<AtomicU64>,
    debounce: Duration,
}

impl<S: Clone> Clone for DashboardDriver<S> {
    fn clone(&self) -> Self {
        Self {
            dashboard: Arc::clone(&self.dashboard),
            source: self.source.clone(),
            search_tick: Arc::clone(&self.search_tick),
            debounce: self.debounce,
        }
    }
}

impl<S> DashboardDriver<S>
where
    S: AdvisorSource,
{
    pub fn new(source: S) -> Self {
        Self::with_debounce(source, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(source: S, debounce: Duration) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(Dashboard::new())),
            source,
            search_tick: Arc::new(AtomicU64::new(0)),
            debounce,
        }
    }

    /// Loads the unfiltered option cache, then the first page.
    ///
    /// An option-load failure is recorded for display and does not prevent
    /// the first page from loading.
    pub async fn bootstrap(&self) -> Result<(), DashboardError> {
        let options_result = self
            .source
            .query_distinct_facet_values(FacetSelection::new())
            .await;

        let (request, options_error) = {
            let mut dashboard = self.dashboard.lock().await;
            let options_error = match options_result {
                Ok(options) => {
                    dashboard.set_unfiltered_options(options);
                    None
                }
                Err(err) => {
                    dashboard.fail_unfiltered_options(&err);
                    Some(err)
                }
            };
            (dashboard.refresh(), options_error)
        };

        self.run_page(request).await?;

        match options_error {
            Some(err) => Err(DashboardError::RemoteQueryFailure(err)),
            None => Ok(()),
        }
    }

    /// Debounced search. Returns `false` when a later call superseded this one.
    pub async fn search(&self, text: impl Into<String>) -> Result<bool, DashboardError> {
        let text = text.into();
        let tick = self.search_tick.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.debounce).await;
        if self.search_tick.load(Ordering::SeqCst) != tick {
            return Ok(false);
        }

        let request = self.dashboard.lock().await.set_search_text(text);
        self.run_page(request).await?;
        Ok(true)
    }

    pub async fn sort_by(&self, column: SortColumn) -> Result<(), DashboardError> {
        let request = self.dashboard.lock().await.sort_by(column);
        self.run_page(request).await
    }

    /// Flips a pending value and recomputes the cascaded options.
    ///
    /// Cascade failures leave the previous options in place; the error is
    /// returned for logging only.
    pub async fn toggle_facet(
        &self,
        facet: Facet,
        value: impl Into<String>,
    ) -> Result<(), DashboardError> {
        let request = self
            .dashboard
            .lock()
            .await
            .toggle_facet_value(facet, value);
        self.run_cascade(request).await
    }

    pub async fn apply_filters(&self) -> Result<(), DashboardError> {
        let request = self.dashboard.lock().await.apply();
        self.run_page(request).await
    }

    pub async fn reset_filters(&self) -> Result<(), DashboardError> {
        let request = self.dashboard.lock().await.reset();
        self.run_page(request).await
    }

    pub async fn refresh(&self) -> Result<(), DashboardError> {
        let request = self.dashboard.lock().await.refresh();
        self.run_page(request).await
    }

    /// Fetches the next page. Returns `false` when nothing was started because
    /// a fetch is already outstanding or the list is exhausted.
    pub async fn load_more(&self) -> Result<bool, DashboardError> {
        let request = self.dashboard.lock().await.load_more();
        match request {
            Some(request) => self.run_page(request).await.map(|()| true),
            None => Ok(false),
        }
    }

    pub async fn view(&self) -> DashboardView {
        self.dashboard.lock().await.view()
    }

    async fn run_page(&self, request: PageRequest) -> Result<(), DashboardError> {
        let outcome =
            composer::execute(&self.source, &request.snapshot, request.page_index).await;
        self.dashboard.lock().await.complete_page(request, outcome)
    }

    async fn run_cascade(&self, request: CascadeRequest) -> Result<(), DashboardError> {
        let outcome =
            resolver::recompute(&self.source, &request.pending, &request.unfiltered).await;
        self.dashboard.lock().await.complete_cascade(request, outcome)
    }
}
