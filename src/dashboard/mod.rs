//! Query engine behind the advisor dashboard.
//!
//! [`Dashboard`] is a single-writer state object. Every transition that needs
//! the remote data source returns a tagged request record; the caller runs it
//! and hands the outcome back through `complete_page` / `complete_cascade`,
//! which drop anything issued before a newer campaign or cascade started.
//! [`driver::DashboardDriver`] wires those requests to an
//! [`AdvisorSource`](crate::repository::source::AdvisorSource).

use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::dashboard::accumulator::{CampaignId, PageRequest, ResultAccumulator};
use crate::dashboard::composer::{CampaignSnapshot, ResultPage};
use crate::dashboard::resolver::CascadeRequest;
use crate::domain::advisor::{AdvisorSort, SortColumn};
use crate::domain::facet::{Facet, FacetOptions, FacetSelection};
use crate::dto::dashboard::DashboardView;
use crate::repository::errors::{RepositoryError, RepositoryResult};

pub mod accumulator;
pub mod composer;
pub mod driver;
pub mod resolver;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("remote query failed: {0}")]
    RemoteQueryFailure(#[from] RepositoryError),

    #[error("stale {0} discarded")]
    StaleResultDiscarded(StaleResult),

    #[error("authentication required")]
    AuthenticationRequired,
}

/// Identifies a result that arrived after it was superseded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaleResult {
    Page(CampaignId),
    Cascade(u64),
}

impl Display for StaleResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StaleResult::Page(campaign) => write!(f, "page of campaign {campaign}"),
            StaleResult::Cascade(generation) => write!(f, "cascade generation {generation}"),
        }
    }
}

/// Search text and ordering of the active campaign.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryState {
    pub search_text: String,
    pub sort: AdvisorSort,
}

#[derive(Debug, Default)]
pub struct Dashboard {
    unfiltered: FacetOptions,
    cascaded: FacetOptions,
    options_error: Option<String>,
    pending: FacetSelection,
    active: FacetSelection,
    query: QueryState,
    results: ResultAccumulator,
    cascade_generation: u64,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the session-wide unfiltered option cache. Pending values stay
    /// listed even if the cache does not carry them.
    pub fn set_unfiltered_options(&mut self, options: FacetOptions) {
        self.cascaded = resolver::merge(&self.pending, &options, &[]);
        self.unfiltered = options;
        self.options_error = None;
    }

    /// Records that the unfiltered options could not be loaded.
    pub fn fail_unfiltered_options(&mut self, err: &RepositoryError) {
        log::error!("Failed to load facet options: {err}");
        self.options_error = Some(err.to_string());
    }

    fn snapshot(&self) -> CampaignSnapshot {
        CampaignSnapshot {
            search_text: self.query.search_text.clone(),
            filters: self.active.clone(),
            sort: self.query.sort,
        }
    }

    fn start_campaign(&mut self) -> PageRequest {
        let snapshot = self.snapshot();
        self.results.start_campaign(snapshot)
    }

    fn cascade_request(&mut self) -> CascadeRequest {
        self.cascade_generation += 1;
        CascadeRequest {
            generation: self.cascade_generation,
            pending: self.pending.clone(),
            unfiltered: self.unfiltered.clone(),
        }
    }

    /// Flips one pending value. Never starts a campaign, only a cascade.
    pub fn toggle_facet_value(&mut self, facet: Facet, value: impl Into<String>) -> CascadeRequest {
        self.pending = self.pending.toggled(facet, value);
        self.cascade_request()
    }

    /// Applies a cascade outcome. Failures keep the last good option set.
    pub fn complete_cascade(
        &mut self,
        request: CascadeRequest,
        outcome: RepositoryResult<FacetOptions>,
    ) -> Result<(), DashboardError> {
        if request.generation != self.cascade_generation {
            log::debug!("Discarding cascade generation {}", request.generation);
            return Err(DashboardError::StaleResultDiscarded(StaleResult::Cascade(
                request.generation,
            )));
        }

        match outcome {
            Ok(cascaded) => {
                self.pending = resolver::prune(&self.pending, &cascaded);
                self.cascaded = cascaded;
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to recompute cascading filters: {err}");
                Err(DashboardError::RemoteQueryFailure(err))
            }
        }
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.diff(&self.active).is_empty()
    }

    /// Commits pending selections and starts a page-0 campaign.
    pub fn apply(&mut self) -> PageRequest {
        self.active = self.pending.clone();
        self.start_campaign()
    }

    /// Clears selections, search and sort, and starts an unconstrained campaign.
    pub fn reset(&mut self) -> PageRequest {
        self.pending = FacetSelection::new();
        self.active = FacetSelection::new();
        self.query = QueryState::default();
        self.cascaded = self.unfiltered.clone();
        // invalidates any cascade still in flight
        self.cascade_generation += 1;
        self.start_campaign()
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) -> PageRequest {
        self.query.search_text = text.into();
        self.start_campaign()
    }

    pub fn sort_by(&mut self, column: SortColumn) -> PageRequest {
        self.query.sort = self.query.sort.clicked(column);
        self.start_campaign()
    }

    /// Restarts the current campaign from page 0.
    pub fn refresh(&mut self) -> PageRequest {
        self.start_campaign()
    }

    /// Continuation requested by the scroll sentinel.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        self.results.request_more()
    }

    pub fn complete_page(
        &mut self,
        request: PageRequest,
        outcome: RepositoryResult<ResultPage>,
    ) -> Result<(), DashboardError> {
        self.results.complete(request, outcome)
    }

    pub fn results(&self) -> &ResultAccumulator {
        &self.results
    }

    pub fn pending(&self) -> &FacetSelection {
        &self.pending
    }

    pub fn active(&self) -> &FacetSelection {
        &self.active
    }

    pub fn cascaded_options(&self) -> &FacetOptions {
        &self.cascaded
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            advisors: self.results.records().to_vec(),
            total_count: self.results.total_count(),
            has_more: self.results.has_more(),
            load_state: self.results.state(),
            error: self.results.error().map(str::to_string),
            options_error: self.options_error.clone(),
            search_text: self.query.search_text.clone(),
            sort: self.query.sort,
            pending: self.pending.clone(),
            active: self.active.clone(),
            options: self.cascaded.clone(),
            has_pending_changes: self.has_pending_changes(),
        }
    }
}
