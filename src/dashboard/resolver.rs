//! Cascading facet options: which values stay selectable given the other
//! facets' pending choices.

use crate::domain::facet::{Facet, FacetOptions, FacetSelection};
use crate::repository::errors::RepositoryResult;
use crate::repository::source::AdvisorSource;

/// Recomputation tagged with the pending snapshot it was issued for.
#[derive(Clone, Debug, PartialEq)]
pub struct CascadeRequest {
    pub generation: u64,
    pub pending: FacetSelection,
    pub unfiltered: FacetOptions,
}

/// One remote lookup and the facets whose option lists it feeds.
#[derive(Clone, Debug, PartialEq)]
pub struct CascadeQuery {
    pub constraint: FacetSelection,
    pub facets: Vec<Facet>,
}

/// Groups facets by the constraint their options are derived from.
///
/// A facet is never constrained by its own selection. Facets whose remaining
/// constraint is empty are served from the unfiltered cache and get no query.
pub fn plan(pending: &FacetSelection) -> Vec<CascadeQuery> {
    let mut queries: Vec<CascadeQuery> = Vec::new();
    for facet in Facet::ALL {
        let constraint = pending.without(facet);
        if constraint.is_empty() {
            continue;
        }
        match queries.iter_mut().find(|query| query.constraint == constraint) {
            Some(query) => query.facets.push(facet),
            None => queries.push(CascadeQuery {
                constraint,
                facets: vec![facet],
            }),
        }
    }
    queries
}

/// `sort(unique(pending[f] ∪ observed[f]))` for every facet.
pub fn merge(
    pending: &FacetSelection,
    unfiltered: &FacetOptions,
    derived: &[(CascadeQuery, FacetOptions)],
) -> FacetOptions {
    let mut cascaded = FacetOptions::new();
    for facet in Facet::ALL {
        let observed = derived
            .iter()
            .find(|(query, _)| query.facets.contains(&facet))
            .map_or_else(|| unfiltered.get(facet), |(_, options)| options.get(facet));
        let selected = pending.get(facet).into_iter().flatten();
        cascaded.set(facet, selected.chain(observed).cloned());
    }
    cascaded
}

/// Single pruning pass over `pending`; never re-triggers a recomputation.
pub fn prune(pending: &FacetSelection, cascaded: &FacetOptions) -> FacetSelection {
    pending.pruned_to(cascaded)
}

/// Computes the cascaded option set for `pending`.
pub async fn recompute<S>(
    source: &S,
    pending: &FacetSelection,
    unfiltered: &FacetOptions,
) -> RepositoryResult<FacetOptions>
where
    S: AdvisorSource + ?Sized,
{
    if pending.is_empty() {
        return Ok(unfiltered.clone());
    }

    let mut derived = Vec::new();
    for query in plan(pending) {
        let options = source
            .query_distinct_facet_values(query.constraint.clone())
            .await?;
        derived.push((query, options));
    }

    Ok(merge(pending, unfiltered, &derived))
}
