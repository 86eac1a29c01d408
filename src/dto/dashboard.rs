//! Serializable snapshot of one user's dashboard.

use serde::Serialize;

use crate::dashboard::accumulator::LoadState;
use crate::domain::advisor::{Advisor, AdvisorSort};
use crate::domain::facet::{FacetOptions, FacetSelection};

/// Everything the advisor table, filter panel and header need to render.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardView {
    /// The view list, in campaign order.
    pub advisors: Vec<Advisor>,
    pub total_count: usize,
    pub has_more: bool,
    pub load_state: LoadState,
    /// Failure of the last page fetch, if any.
    pub error: Option<String>,
    /// Failure of the unfiltered facet option load, if any.
    pub options_error: Option<String>,
    pub search_text: String,
    pub sort: AdvisorSort,
    pub pending: FacetSelection,
    pub active: FacetSelection,
    /// Cascaded option lists for the filter panel.
    pub options: FacetOptions,
    /// Whether "Apply" would change the active filters.
    pub has_pending_changes: bool,
}
