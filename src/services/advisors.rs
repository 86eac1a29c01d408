use crate::SERVICE_ACCESS_ROLE;
use crate::dashboard::composer::{PAGE_SIZE, ResultPage};
use crate::domain::facet::{FacetOptions, FacetSelection};
use crate::dto::api::{AdvisorsQuery, AdvisorsResponse};
use crate::forms::FormError;
use crate::models::auth::AuthenticatedUser;
use crate::repository::{AdvisorQuery, AdvisorReader};
use crate::services::{ServiceResult, ensure_role};

/// Returns one page of advisors matching the search, filters and sort.
pub fn list_advisors<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: AdvisorsQuery,
) -> ServiceResult<AdvisorsResponse>
where
    R: AdvisorReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let page_index = params.page.unwrap_or(0);
    let mut query = AdvisorQuery::new()
        .filters(params.filters)
        .sort(params.sort.column, params.sort.direction)
        .paginate(page_index, PAGE_SIZE);
    if query.pagination.is_some_and(|p| p.offset_limit().is_none()) {
        return Err(FormError::PageOutOfRange.into());
    }
    if let Some(search) = params.search {
        query = query.search(search);
    }

    let (total, advisors) = repo.list_advisors(&query).map_err(|err| {
        log::error!("Failed to list advisors: {err}");
        err
    })?;
    let page = ResultPage::new(page_index, advisors, total);

    Ok(AdvisorsResponse {
        total: page.total_count,
        has_more: page.has_more,
        advisors: page.records,
    })
}

/// Distinct facet values among advisors matching `filters`.
pub fn list_facet_values<R>(
    repo: &R,
    user: &AuthenticatedUser,
    filters: &FacetSelection,
) -> ServiceResult<FacetOptions>
where
    R: AdvisorReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    Ok(repo.list_facet_values(filters).map_err(|err| {
        log::error!("Failed to list facet values: {err}");
        err
    })?)
}
