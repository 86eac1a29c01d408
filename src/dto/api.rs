//! DTOs exposed by the JSON API endpoints.

use serde::Serialize;

use crate::domain::advisor::{Advisor, AdvisorSort};
use crate::domain::facet::FacetSelection;

/// Query accepted by [`crate::services::advisors::list_advisors`].
#[derive(Debug, Default)]
pub struct AdvisorsQuery {
    pub search: Option<String>,
    pub filters: FacetSelection,
    pub sort: AdvisorSort,
    /// Zero-based page; the first page when absent.
    pub page: Option<usize>,
}

/// Result payload of the `/api/v1/advisors` endpoint.
#[derive(Debug, Serialize)]
pub struct AdvisorsResponse {
    /// Total number of advisors matching the query.
    pub total: usize,
    pub has_more: bool,
    /// Requested page of advisors.
    pub advisors: Vec<Advisor>,
}

#[derive(Debug, Serialize)]
pub struct AnnouncementResponse {
    /// Body of the latest announcement, if any.
    pub announcement: Option<String>,
}
