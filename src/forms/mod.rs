//! Form and query-string definitions backing the dashboard routes.

use thiserror::Error;
use validator::ValidationErrors;

pub mod api;
pub mod dashboard;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid query string: {0}")]
    QueryString(String),

    #[error("invalid facet")]
    InvalidFacet,

    #[error("invalid sort column")]
    InvalidSortColumn,

    #[error("invalid sort direction")]
    InvalidSortDirection,

    #[error("page is out of range")]
    PageOutOfRange,
}
