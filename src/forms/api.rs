//! Query string of the advisor listing API.

use serde::Deserialize;

use crate::dashboard::composer::PAGE_SIZE;
use crate::domain::advisor::{AdvisorSort, SortColumn, SortDirection};
use crate::domain::facet::{Facet, FacetSelection};
use crate::dto::api::AdvisorsQuery;
use crate::forms::FormError;
use crate::repository::Pagination;

/// Raw `/api/v1/advisors` parameters. Facet keys may repeat, e.g.
/// `?province=Ontario&province=Quebec`.
#[derive(Debug, Default, Deserialize)]
pub struct AdvisorsQueryParams {
    pub search: Option<String>,
    #[serde(default)]
    pub province: Vec<String>,
    #[serde(default)]
    pub city: Vec<String>,
    #[serde(default)]
    pub firm: Vec<String>,
    #[serde(default)]
    pub branch: Vec<String>,
    #[serde(default)]
    pub team: Vec<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<usize>,
}

impl AdvisorsQueryParams {
    /// Parses a raw query string.
    pub fn from_query_string(query: &str) -> Result<Self, FormError> {
        serde_html_form::from_str(query).map_err(|err| FormError::QueryString(err.to_string()))
    }

    fn facet_values(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::Province => &self.province,
            Facet::City => &self.city,
            Facet::Firm => &self.firm,
            Facet::Branch => &self.branch,
            Facet::Team => &self.team,
        }
    }
}

impl TryFrom<AdvisorsQueryParams> for AdvisorsQuery {
    type Error = FormError;

    fn try_from(params: AdvisorsQueryParams) -> Result<Self, Self::Error> {
        let filters: FacetSelection = Facet::ALL
            .into_iter()
            .flat_map(|facet| {
                params
                    .facet_values(facet)
                    .iter()
                    .map(|value| value.trim())
                    .filter(|value| !value.is_empty())
                    .map(move |value| (facet, value.to_string()))
            })
            .collect();

        let column = match params.sort.as_deref() {
            Some(column) => column
                .parse::<SortColumn>()
                .map_err(|_| FormError::InvalidSortColumn)?,
            None => SortColumn::default(),
        };
        let direction = match params.direction.as_deref() {
            Some(direction) => direction
                .parse::<SortDirection>()
                .map_err(|_| FormError::InvalidSortDirection)?,
            None => SortDirection::default(),
        };

        let out_of_range = params.page.is_some_and(|page_index| {
            Pagination {
                page_index,
                per_page: PAGE_SIZE,
            }
            .offset_limit()
            .is_none()
        });
        if out_of_range {
            return Err(FormError::PageOutOfRange);
        }

        Ok(AdvisorsQuery {
            search: params.search,
            filters,
            sort: AdvisorSort::new(column, direction),
            page: params.page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_facet_keys_collect_into_one_selection() {
        let params = AdvisorsQueryParams::from_query_string(
            "province=Ontario&province=Quebec&city=Ottawa&sort=city&direction=desc&page=2",
        )
        .expect("valid query string");

        let query = AdvisorsQuery::try_from(params).expect("valid query");

        assert!(query.filters.contains(Facet::Province, "Ontario"));
        assert!(query.filters.contains(Facet::Province, "Quebec"));
        assert!(query.filters.contains(Facet::City, "Ottawa"));
        assert_eq!(
            query.sort,
            AdvisorSort::new(SortColumn::City, SortDirection::Descending)
        );
        assert_eq!(query.page, Some(2));
    }

    #[test]
    fn empty_query_string_uses_defaults() {
        let params = AdvisorsQueryParams::from_query_string("").expect("empty is valid");
        let query = AdvisorsQuery::try_from(params).expect("valid query");

        assert!(query.filters.is_empty());
        assert_eq!(query.sort, AdvisorSort::default());
        assert_eq!(query.search, None);
    }

    #[test]
    fn page_beyond_any_offset_is_rejected() {
        let params = AdvisorsQueryParams::from_query_string("page=400000000000000000")
            .expect("fits usize");
        assert!(matches!(
            AdvisorsQuery::try_from(params),
            Err(FormError::PageOutOfRange)
        ));

        let params = AdvisorsQueryParams::from_query_string("page=3").expect("parses");
        assert_eq!(
            AdvisorsQuery::try_from(params).expect("valid query").page,
            Some(3)
        );
    }

    #[test]
    fn unknown_sort_column_is_rejected() {
        let params = AdvisorsQueryParams::from_query_string("sort=salary").expect("parses");
        assert!(matches!(
            AdvisorsQuery::try_from(params),
            Err(FormError::InvalidSortColumn)
        ));
    }
}
