use crate::db::DbPool;
use crate::domain::advisor::{Advisor, AdvisorSort, NewAdvisor, SortColumn, SortDirection};
use crate::domain::announcement::{Announcement, NewAnnouncement};
use crate::domain::facet::{FacetOptions, FacetSelection};
use crate::repository::errors::RepositoryResult;

pub mod advisor;
pub mod announcement;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
#[cfg(feature = "server")]
pub mod source;

/// Zero-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_index: usize,
    pub per_page: usize,
}

impl Pagination {
    /// SQL `(OFFSET, LIMIT)` of this page, or `None` when the offset does not
    /// fit a SQLite integer.
    pub fn offset_limit(&self) -> Option<(i64, i64)> {
        let offset = self.page_index.checked_mul(self.per_page)?;
        Some((i64::try_from(offset).ok()?, i64::try_from(self.per_page).ok()?))
    }
}

/// Filter/sort/paginate request against the advisor table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvisorQuery {
    /// Substring matched against first or last name.
    pub search: Option<String>,
    pub filters: FacetSelection,
    pub sort: AdvisorSort,
    pub pagination: Option<Pagination>,
}

impl AdvisorQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name search; blank input disables it.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let trimmed = search.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn filters(mut self, filters: FacetSelection) -> Self {
        self.filters = filters;
        self
    }

    pub fn sort(mut self, column: SortColumn, direction: SortDirection) -> Self {
        self.sort = AdvisorSort::new(column, direction);
        self
    }

    pub fn paginate(mut self, page_index: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination {
            page_index,
            per_page,
        });
        self
    }
}

pub trait AdvisorReader {
    /// Returns the total number of matches and the requested page of them.
    fn list_advisors(&self, query: &AdvisorQuery) -> RepositoryResult<(usize, Vec<Advisor>)>;
    /// Distinct facet values among advisors matching `filters`.
    fn list_facet_values(&self, filters: &FacetSelection) -> RepositoryResult<FacetOptions>;
}

pub trait AdvisorWriter {
    fn create_advisors(&self, new_advisors: &[NewAdvisor]) -> RepositoryResult<usize>;
}

pub trait AnnouncementReader {
    fn latest_announcement(&self) -> RepositoryResult<Option<Announcement>>;
}

pub trait AnnouncementWriter {
    fn create_announcement(&self, announcement: &NewAnnouncement)
    -> RepositoryResult<Announcement>;
}

/// Diesel-backed implementation of every repository trait.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<crate::db::DbConnection> {
        Ok(crate::db::get_connection(&self.pool)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_offset_starts_after_previous_pages() {
        let page = Pagination {
            page_index: 2,
            per_page: 50,
        };
        assert_eq!(page.offset_limit(), Some((100, 50)));
    }

    #[test]
    fn oversized_page_has_no_offset() {
        let overflowing = Pagination {
            page_index: usize::MAX / 2,
            per_page: 50,
        };
        assert_eq!(overflowing.offset_limit(), None);

        let too_far_for_sqlite = Pagination {
            page_index: usize::try_from(i64::MAX).unwrap_or(usize::MAX) / 50 + 1,
            per_page: 50,
        };
        assert_eq!(too_far_for_sqlite.offset_limit(), None);
    }

    #[test]
    fn blank_search_is_dropped() {
        assert_eq!(AdvisorQuery::new().search("   ").search, None);
        assert_eq!(
            AdvisorQuery::new().search("  Jane ").search.as_deref(),
            Some("Jane")
        );
    }
}
