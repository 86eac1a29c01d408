//! Turns a campaign snapshot plus a page index into one remote query.

use serde::Serialize;

use crate::domain::advisor::{Advisor, AdvisorSort};
use crate::domain::facet::FacetSelection;
use crate::repository::AdvisorQuery;
use crate::repository::errors::RepositoryResult;
use crate::repository::source::AdvisorSource;

/// Number of advisors fetched per page.
pub const PAGE_SIZE: usize = 50;

/// Fixed search + filter + sort intent shared by every page of a campaign.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CampaignSnapshot {
    pub search_text: String,
    pub filters: FacetSelection,
    pub sort: AdvisorSort,
}

/// One fetched page relative to a campaign snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultPage {
    pub page_index: usize,
    pub records: Vec<Advisor>,
    pub total_count: usize,
    pub has_more: bool,
}

impl ResultPage {
    pub fn new(page_index: usize, records: Vec<Advisor>, total_count: usize) -> Self {
        Self {
            page_index,
            records,
            total_count,
            has_more: page_index
                .checked_add(1)
                .and_then(|pages| pages.checked_mul(PAGE_SIZE))
                .is_some_and(|seen| total_count > seen),
        }
    }
}

/// Builds the query for `page_index` of the campaign described by `snapshot`.
pub fn compose(snapshot: &CampaignSnapshot, page_index: usize) -> AdvisorQuery {
    AdvisorQuery::new()
        .search(snapshot.search_text.as_str())
        .filters(snapshot.filters.clone())
        .sort(snapshot.sort.column, snapshot.sort.direction)
        .paginate(page_index, PAGE_SIZE)
}

/// Executes the composed query against `source`.
pub async fn execute<S>(
    source: &S,
    snapshot: &CampaignSnapshot,
    page_index: usize,
) -> RepositoryResult<ResultPage>
where
    S: AdvisorSource + ?Sized,
{
    let (total_count, records) = source
        .query_advisors(compose(snapshot, page_index))
        .await?;
    Ok(ResultPage::new(page_index, records, total_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::advisor::{SortColumn, SortDirection};
    use crate::domain::facet::Facet;
    use crate::repository::Pagination;

    #[test]
    fn compose_carries_every_part_of_the_snapshot() {
        let snapshot = CampaignSnapshot {
            search_text: "  Jane ".to_string(),
            filters: [(Facet::Firm, "Acme")].into_iter().collect(),
            sort: AdvisorSort::new(SortColumn::City, SortDirection::Descending),
        };

        let query = compose(&snapshot, 2);

        assert_eq!(query.search.as_deref(), Some("Jane"));
        assert!(query.filters.contains(Facet::Firm, "Acme"));
        assert_eq!(query.sort, snapshot.sort);
        assert_eq!(
            query.pagination,
            Some(Pagination {
                page_index: 2,
                per_page: PAGE_SIZE
            })
        );
        assert_eq!(
            query.pagination.and_then(|p| p.offset_limit()),
            Some((100, 50))
        );
    }

    #[test]
    fn whitespace_search_means_no_predicate() {
        let snapshot = CampaignSnapshot {
            search_text: " \t ".to_string(),
            ..CampaignSnapshot::default()
        };

        assert_eq!(compose(&snapshot, 0).search, None);
    }

    #[test]
    fn has_more_depends_on_total_and_page() {
        assert!(ResultPage::new(0, Vec::new(), 120).has_more);
        assert!(ResultPage::new(1, Vec::new(), 120).has_more);
        assert!(!ResultPage::new(2, Vec::new(), 120).has_more);
        assert!(!ResultPage::new(0, Vec::new(), 50).has_more);
        assert!(ResultPage::new(0, Vec::new(), 51).has_more);
        assert!(!ResultPage::new(usize::MAX, Vec::new(), 120).has_more);
    }
}
