//! The single ordered view list and its pagination cursor.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::dashboard::{DashboardError, StaleResult};
use crate::dashboard::composer::{CampaignSnapshot, ResultPage};
use crate::domain::advisor::Advisor;
use crate::domain::types::AdvisorId;
use crate::repository::errors::RepositoryResult;

/// Monotonically increasing identity of a query campaign.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CampaignId(u64);

impl CampaignId {
    #[must_use]
    fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for CampaignId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a fetched page replaces the view list or extends it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    Replace,
    Append,
}

/// An outstanding page fetch, tagged with the campaign that issued it.
#[derive(Clone, Debug, PartialEq)]
pub struct PageRequest {
    pub campaign: CampaignId,
    pub kind: FetchKind,
    pub page_index: usize,
    pub snapshot: CampaignSnapshot,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    LoadingMore {
        page_index: usize,
    },
}

#[derive(Debug, Default)]
pub struct ResultAccumulator {
    campaign: CampaignId,
    snapshot: CampaignSnapshot,
    records: Vec<Advisor>,
    seen: HashSet<AdvisorId>,
    total_count: usize,
    has_more: bool,
    page_index: usize,
    state: LoadState,
    error: Option<String>,
}

impl ResultAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersedes the current campaign: clears the view list and requests page 0.
    pub fn start_campaign(&mut self, snapshot: CampaignSnapshot) -> PageRequest {
        self.campaign = self.campaign.next();
        self.snapshot = snapshot;
        self.records.clear();
        self.seen.clear();
        self.total_count = 0;
        self.has_more = false;
        self.page_index = 0;
        self.error = None;
        self.state = LoadState::Loading;

        PageRequest {
            campaign: self.campaign,
            kind: FetchKind::Replace,
            page_index: 0,
            snapshot: self.snapshot.clone(),
        }
    }

    /// Requests the next page, unless a fetch is outstanding or nothing is left.
    pub fn request_more(&mut self) -> Option<PageRequest> {
        if self.state != LoadState::Idle || !self.has_more {
            return None;
        }

        let page_index = self.page_index + 1;
        self.state = LoadState::LoadingMore { page_index };

        Some(PageRequest {
            campaign: self.campaign,
            kind: FetchKind::Append,
            page_index,
            snapshot: self.snapshot.clone(),
        })
    }

    fn is_outstanding(&self, request: &PageRequest) -> bool {
        if request.campaign != self.campaign {
            return false;
        }
        match (self.state, request.kind) {
            (LoadState::Loading, FetchKind::Replace) => true,
            (LoadState::LoadingMore { page_index }, FetchKind::Append) => {
                page_index == request.page_index
            }
            _ => false,
        }
    }

    /// Applies the outcome of `request`, discarding it if it is no longer the
    /// outstanding fetch of the current campaign.
    pub fn complete(
        &mut self,
        request: PageRequest,
        outcome: RepositoryResult<ResultPage>,
    ) -> Result<(), DashboardError> {
        if !self.is_outstanding(&request) {
            log::debug!(
                "Discarding page {} of campaign {} (current campaign {})",
                request.page_index,
                request.campaign,
                self.campaign
            );
            return Err(DashboardError::StaleResultDiscarded(StaleResult::Page(
                request.campaign,
            )));
        }

        self.state = LoadState::Idle;

        match outcome {
            Ok(page) => {
                if request.kind == FetchKind::Replace {
                    self.records.clear();
                    self.seen.clear();
                }
                for record in page.records {
                    if self.seen.insert(record.id) {
                        self.records.push(record);
                    }
                }
                self.total_count = page.total_count;
                self.has_more = page.has_more;
                self.page_index = request.page_index;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                log::error!(
                    "Failed to load page {} of campaign {}: {err}",
                    request.page_index,
                    request.campaign
                );
                self.error = Some(err.to_string());
                Err(DashboardError::RemoteQueryFailure(err))
            }
        }
    }

    pub fn records(&self) -> &[Advisor] {
        &self.records
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn campaign(&self) -> CampaignId {
        self.campaign
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::composer::PAGE_SIZE;
    use crate::domain::types::PersonName;
    use crate::repository::errors::RepositoryError;

    fn advisor(id: i32) -> Advisor {
        Advisor {
            id: AdvisorId::new(id).expect("valid id"),
            first_name: PersonName::new(format!("First{id}")).expect("valid name"),
            last_name: PersonName::new(format!("Last{id}")).expect("valid name"),
            team_name: None,
            title: None,
            firm: None,
            branch: None,
            city: None,
            province: None,
            email: None,
            website_url: None,
            linkedin_url: None,
        }
    }

    fn page(page_index: usize, ids: std::ops::Range<i32>, total: usize) -> ResultPage {
        ResultPage::new(page_index, ids.map(advisor).collect(), total)
    }

    fn ids(acc: &ResultAccumulator) -> Vec<i32> {
        acc.records().iter().map(|a| a.id.get()).collect()
    }

    #[test]
    fn stale_campaign_results_are_discarded() {
        let mut acc = ResultAccumulator::new();
        let slow = acc.start_campaign(CampaignSnapshot::default());
        let fast = acc.start_campaign(CampaignSnapshot {
            search_text: "jane".to_string(),
            ..CampaignSnapshot::default()
        });

        acc.complete(fast, Ok(page(0, 1..3, 2))).expect("current campaign");
        let stale = acc.complete(slow, Ok(page(0, 10..20, 10)));

        assert!(matches!(stale, Err(DashboardError::StaleResultDiscarded(_))));
        assert_eq!(ids(&acc), vec![1, 2]);
        assert_eq!(acc.total_count(), 2);
    }

    #[test]
    fn only_one_fetch_per_campaign_at_a_time() {
        let mut acc = ResultAccumulator::new();
        assert!(acc.request_more().is_none(), "nothing loaded yet");

        let first = acc.start_campaign(CampaignSnapshot::default());
        assert!(acc.request_more().is_none(), "page 0 still loading");
        acc.complete(first, Ok(page(0, 1..51, 120))).expect("applied");

        let second = acc.request_more().expect("more available");
        assert_eq!(second.page_index, 1);
        assert!(acc.request_more().is_none(), "busy until page 1 lands");
        assert_eq!(acc.state(), LoadState::LoadingMore { page_index: 1 });
    }

    #[test]
    fn pages_accumulate_until_exhausted() {
        let mut acc = ResultAccumulator::new();
        let request = acc.start_campaign(CampaignSnapshot::default());
        acc.complete(request, Ok(page(0, 1..51, 120))).expect("page 0");
        let request = acc.request_more().expect("page 1");
        acc.complete(request, Ok(page(1, 51..101, 120))).expect("page 1");
        let request = acc.request_more().expect("page 2");
        acc.complete(request, Ok(page(2, 101..121, 120))).expect("page 2");

        assert_eq!(acc.records().len(), 2 * PAGE_SIZE + 20);
        assert!(!acc.has_more());
        assert!(acc.request_more().is_none());
    }

    #[test]
    fn duplicate_records_are_merged_once() {
        let mut acc = ResultAccumulator::new();
        let request = acc.start_campaign(CampaignSnapshot::default());
        acc.complete(request, Ok(page(0, 1..51, 60))).expect("page 0");
        let request = acc.request_more().expect("page 1");
        acc.complete(request, Ok(page(1, 50..61, 60))).expect("page 1");

        assert_eq!(acc.records().len(), 60);
        assert_eq!(ids(&acc).last(), Some(&60));
    }

    #[test]
    fn failed_first_page_leaves_empty_list_and_error() {
        let mut acc = ResultAccumulator::new();
        let request = acc.start_campaign(CampaignSnapshot::default());

        let result = acc.complete(
            request,
            Err(RepositoryError::ConnectionError("offline".into())),
        );

        assert!(matches!(result, Err(DashboardError::RemoteQueryFailure(_))));
        assert!(acc.records().is_empty());
        assert_eq!(acc.state(), LoadState::Idle);
        assert!(acc.error().is_some_and(|e| e.contains("offline")));
    }

    #[test]
    fn failed_continuation_keeps_existing_records() {
        let mut acc = ResultAccumulator::new();
        let request = acc.start_campaign(CampaignSnapshot::default());
        acc.complete(request, Ok(page(0, 1..51, 120))).expect("page 0");
        let request = acc.request_more().expect("page 1");

        let _ = acc.complete(request, Err(RepositoryError::Unexpected("boom".into())));

        assert_eq!(acc.records().len(), PAGE_SIZE);
        let retry = acc.request_more().expect("user may scroll again");
        assert_eq!(retry.page_index, 1);
    }

    #[test]
    fn completing_twice_is_rejected() {
        let mut acc = ResultAccumulator::new();
        let request = acc.start_campaign(CampaignSnapshot::default());
        acc.complete(request.clone(), Ok(page(0, 1..3, 2)))
            .expect("first completion");

        assert!(acc.complete(request, Ok(page(0, 7..9, 2))).is_err());
        assert_eq!(ids(&acc), vec![1, 2]);
    }
}
