//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::advisor::{Advisor, NewAdvisor};
use crate::domain::announcement::{Announcement, NewAnnouncement};
use crate::domain::facet::{FacetOptions, FacetSelection};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    AdvisorQuery, AdvisorReader, AdvisorWriter, AnnouncementReader, AnnouncementWriter,
};

mock! {
    pub Repository {}

    impl AdvisorReader for Repository {
        fn list_advisors(&self, query: &AdvisorQuery) -> RepositoryResult<(usize, Vec<Advisor>)>;
        fn list_facet_values(&self, filters: &FacetSelection) -> RepositoryResult<FacetOptions>;
    }

    impl AdvisorWriter for Repository {
        fn create_advisors(&self, new_advisors: &[NewAdvisor]) -> RepositoryResult<usize>;
    }

    impl AnnouncementReader for Repository {
        fn latest_announcement(&self) -> RepositoryResult<Option<Announcement>>;
    }

    impl AnnouncementWriter for Repository {
        fn create_announcement(
            &self,
            announcement: &NewAnnouncement,
        ) -> RepositoryResult<Announcement>;
    }
}
