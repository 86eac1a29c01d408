//! Asynchronous query contract consumed by the dashboard engine.

use std::future::Future;
use std::sync::Arc;

use crate::domain::advisor::Advisor;
use crate::domain::facet::{FacetOptions, FacetSelection};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{AdvisorQuery, AdvisorReader};

/// Remote data source answering filter/sort/paginate queries.
pub trait AdvisorSource: Send + Sync {
    /// Runs `query`, returning the total match count and the requested page.
    fn query_advisors(
        &self,
        query: AdvisorQuery,
    ) -> impl Future<Output = RepositoryResult<(usize, Vec<Advisor>)>> + Send;

    /// Distinct facet values among advisors matching `filters`.
    fn query_distinct_facet_values(
        &self,
        filters: FacetSelection,
    ) -> impl Future<Output = RepositoryResult<FacetOptions>> + Send;
}

/// Adapts a blocking [`AdvisorReader`] by running each call on the blocking pool.
pub struct RepositorySource<R> {
    repo: Arc<R>,
}

impl<R> RepositorySource<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }
}

impl<R> Clone for RepositorySource<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

async fn run_blocking<R, T, F>(repo: Arc<R>, call: F) -> RepositoryResult<T>
where
    R: Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&R) -> RepositoryResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || call(&repo)).await {
        Ok(result) => result,
        Err(err) => Err(RepositoryError::Unexpected(format!(
            "blocking query task failed: {err}"
        ))),
    }
}

impl<R> AdvisorSource for RepositorySource<R>
where
    R: AdvisorReader + Send + Sync + 'static,
{
    fn query_advisors(
        &self,
        query: AdvisorQuery,
    ) -> impl Future<Output = RepositoryResult<(usize, Vec<Advisor>)>> + Send {
        run_blocking(Arc::clone(&self.repo), move |repo| repo.list_advisors(&query))
    }

    fn query_distinct_facet_values(
        &self,
        filters: FacetSelection,
    ) -> impl Future<Output = RepositoryResult<FacetOptions>> + Send {
        run_blocking(Arc::clone(&self.repo), move |repo| {
            repo.list_facet_values(&filters)
        })
    }
}
