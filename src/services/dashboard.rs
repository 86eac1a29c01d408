//! Per-user dashboards and the actions the page posts against them.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;
use validator::Validate;

use crate::SERVICE_ACCESS_ROLE;
use crate::dashboard::DashboardError;
use crate::dashboard::driver::{DashboardDriver, SEARCH_DEBOUNCE};
use crate::domain::advisor::SortColumn;
use crate::dto::dashboard::DashboardView;
use crate::forms::dashboard::{SearchForm, SortForm, ToggleFacetForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::source::AdvisorSource;
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Dashboards untouched for this long are dropped on the next access.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct Session<S> {
    driver: DashboardDriver<S>,
    /// Completed once the first bootstrap has run; actions wait on it.
    bootstrapped: Arc<OnceCell<()>>,
    last_seen: Instant,
}

/// One [`DashboardDriver`] per signed-in user, keyed by the token subject.
pub struct DashboardSessions<S> {
    sessions: Mutex<HashMap<String, Session<S>>>,
    source: S,
    debounce: Duration,
    idle_timeout: Duration,
}

impl<S> DashboardSessions<S>
where
    S: AdvisorSource + Clone,
{
    pub fn new(source: S) -> Self {
        Self::with_debounce(source, SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(source: S, debounce: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            source,
            debounce,
            idle_timeout: SESSION_IDLE_TIMEOUT,
        }
    }

    #[must_use]
    pub fn idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Returns the user's dashboard, bootstrapping it on first access.
    ///
    /// Idle dashboards of every user are swept first. Concurrent first
    /// requests share one bootstrap and all wait for it to finish. Claims
    /// without a subject cannot own a dashboard.
    pub async fn driver_for(
        &self,
        user: &AuthenticatedUser,
    ) -> Result<DashboardDriver<S>, DashboardError> {
        if user.sub.trim().is_empty() {
            return Err(DashboardError::AuthenticationRequired);
        }

        let now = Instant::now();
        let (driver, bootstrapped) = {
            let mut sessions = self.sessions.lock().await;
            sessions.retain(|sub, session| {
                let alive = now.duration_since(session.last_seen) < self.idle_timeout;
                if !alive {
                    log::info!("Dropping idle dashboard of user {sub}");
                }
                alive
            });

            let session = sessions
                .entry(user.sub.clone())
                .or_insert_with(|| Session {
                    driver: DashboardDriver::with_debounce(self.source.clone(), self.debounce),
                    bootstrapped: Arc::new(OnceCell::new()),
                    last_seen: now,
                });
            session.last_seen = now;
            (session.driver.clone(), Arc::clone(&session.bootstrapped))
        };

        bootstrapped
            .get_or_init(|| async {
                log::info!("Starting dashboard for user {}", user.sub);
                settle(driver.bootstrap().await);
            })
            .await;
        Ok(driver)
    }

    /// Drops the user's dashboard, e.g. on logout.
    pub async fn end(&self, user: &AuthenticatedUser) {
        self.sessions.lock().await.remove(&user.sub);
    }
}

/// Failures are already recorded in the dashboard state for display, so the
/// action itself still answers with the current view.
fn settle<T>(result: Result<T, DashboardError>) {
    match result {
        Ok(_) => {}
        Err(DashboardError::StaleResultDiscarded(stale)) => {
            log::debug!("Superseded result dropped: {stale}");
        }
        Err(err) => log::warn!("Dashboard action failed: {err}"),
    }
}

async fn authorized<S>(
    sessions: &DashboardSessions<S>,
    user: &AuthenticatedUser,
) -> ServiceResult<DashboardDriver<S>>
where
    S: AdvisorSource + Clone,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    Ok(sessions.driver_for(user).await?)
}

pub async fn show_dashboard<S>(
    sessions: &DashboardSessions<S>,
    user: &AuthenticatedUser,
) -> ServiceResult<DashboardView>
where
    S: AdvisorSource + Clone,
{
    let driver = authorized(sessions, user).await?;
    Ok(driver.view().await)
}

/// Debounced: a search superseded by a newer one answers with the view as is.
pub async fn search<S>(
    sessions: &DashboardSessions<S>,
    user: &AuthenticatedUser,
    form: SearchForm,
) -> ServiceResult<DashboardView>
where
    S: AdvisorSource + Clone,
{
    if let Err(err) = form.validate() {
        log::error!("Failed to validate search form: {err}");
        return Err(ServiceError::Form("search text is too long".to_string()));
    }

    let driver = authorized(sessions, user).await?;
    settle(driver.search(form.q).await);
    Ok(driver.view().await)
}

pub async fn sort<S>(
    sessions: &DashboardSessions<S>,
    user: &AuthenticatedUser,
    form: SortForm,
) -> ServiceResult<DashboardView>
where
    S: AdvisorSource + Clone,
{
    let column = SortColumn::try_from(form)?;
    let driver = authorized(sessions, user).await?;
    settle(driver.sort_by(column).await);
    Ok(driver.view().await)
}

pub async fn toggle_facet<S>(
    sessions: &DashboardSessions<S>,
    user: &AuthenticatedUser,
    form: ToggleFacetForm,
) -> ServiceResult<DashboardView>
where
    S: AdvisorSource + Clone,
{
    let (facet, value) = form.parse()?;
    let driver = authorized(sessions, user).await?;
    settle(driver.toggle_facet(facet, value).await);
    Ok(driver.view().await)
}

pub async fn apply_filters<S>(
    sessions: &DashboardSessions<S>,
    user: &AuthenticatedUser,
) -> ServiceResult<DashboardView>
where
    S: AdvisorSource + Clone,
{
    let driver = authorized(sessions, user).await?;
    settle(driver.apply_filters().await);
    Ok(driver.view().await)
}

pub async fn reset_filters<S>(
    sessions: &DashboardSessions<S>,
    user: &AuthenticatedUser,
) -> ServiceResult<DashboardView>
where
    S: AdvisorSource + Clone,
{
    let driver = authorized(sessions, user).await?;
    settle(driver.reset_filters().await);
    Ok(driver.view().await)
}

pub async fn load_more<S>(
    sessions: &DashboardSessions<S>,
    user: &AuthenticatedUser,
) -> ServiceResult<DashboardView>
where
    S: AdvisorSource + Clone,
{
    let driver = authorized(sessions, user).await?;
    settle(driver.load_more().await);
    Ok(driver.view().await)
}

pub async fn refresh<S>(
    sessions: &DashboardSessions<S>,
    user: &AuthenticatedUser,
) -> ServiceResult<DashboardView>
where
    S: AdvisorSource + Clone,
{
    let driver = authorized(sessions, user).await?;
    settle(driver.refresh().await);
    Ok(driver.view().await)
}

#[cfg(test)]
mod tests {
    use std::future::{Future, ready};

    use super::*;
    use crate::domain::advisor::Advisor;
    use crate::domain::facet::{Facet, FacetOptions, FacetSelection};
    use crate::repository::AdvisorQuery;
    use crate::repository::errors::RepositoryResult;

    #[derive(Clone)]
    struct EmptyDirectory;

    impl AdvisorSource for EmptyDirectory {
        fn query_advisors(
            &self,
            _query: AdvisorQuery,
        ) -> impl Future<Output = RepositoryResult<(usize, Vec<Advisor>)>> + Send {
            ready(Ok((0, Vec::new())))
        }

        fn query_distinct_facet_values(
            &self,
            _filters: FacetSelection,
        ) -> impl Future<Output = RepositoryResult<FacetOptions>> + Send {
            ready(Ok([(Facet::Province, "Ontario".to_string())]
                .into_iter()
                .collect()))
        }
    }

    fn sessions() -> DashboardSessions<EmptyDirectory> {
        DashboardSessions::with_debounce(EmptyDirectory, Duration::ZERO)
    }

    /// Only knows Ontario, and takes a while to say so.
    #[derive(Clone)]
    struct SlowOptions;

    impl AdvisorSource for SlowOptions {
        fn query_advisors(
            &self,
            _query: AdvisorQuery,
        ) -> impl Future<Output = RepositoryResult<(usize, Vec<Advisor>)>> + Send {
            ready(Ok((0, Vec::new())))
        }

        fn query_distinct_facet_values(
            &self,
            filters: FacetSelection,
        ) -> impl Future<Output = RepositoryResult<FacetOptions>> + Send {
            async move {
                if filters.is_empty() {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                }
                Ok([(Facet::Province, "Ontario".to_string())]
                    .into_iter()
                    .collect())
            }
        }
    }

    fn toggle(value: &str) -> ToggleFacetForm {
        ToggleFacetForm {
            facet: "province".to_string(),
            value: value.to_string(),
        }
    }

    fn user(sub: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: sub.to_string(),
            email: format!("{sub}@example.com"),
            name: sub.to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            last_login_at: None,
            exp: 0,
        }
    }

    #[tokio::test]
    async fn dashboard_requires_access_role() {
        let outsider = AuthenticatedUser {
            roles: Vec::new(),
            ..user("outsider")
        };

        let result = show_dashboard(&sessions(), &outsider).await;

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[tokio::test]
    async fn blank_subject_requires_authentication() {
        let result = show_dashboard(&sessions(), &user(" ")).await;

        assert!(matches!(
            result,
            Err(ServiceError::Dashboard(DashboardError::AuthenticationRequired))
        ));
    }

    #[tokio::test]
    async fn overlong_search_is_rejected() {
        let form = SearchForm { q: "a".repeat(101) };

        let result = search(&sessions(), &user("jane"), form).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[tokio::test]
    async fn each_user_gets_an_own_dashboard() {
        let sessions = sessions();
        let jane = user("jane");
        let john = user("john");

        let first = show_dashboard(&sessions, &jane).await.expect("bootstrapped");
        assert_eq!(first.options.get(Facet::Province), ["Ontario"]);

        let toggled = toggle_facet(&sessions, &jane, toggle("Ontario"))
            .await
            .expect("toggled");
        assert!(toggled.pending.contains(Facet::Province, "Ontario"));

        let other = show_dashboard(&sessions, &john).await.expect("bootstrapped");
        assert!(other.pending.is_empty());

        sessions.end(&jane).await;
        let fresh = show_dashboard(&sessions, &jane).await.expect("bootstrapped");
        assert!(fresh.pending.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn idle_dashboards_are_dropped() {
        let sessions = sessions().idle_timeout(Duration::from_secs(60));
        let jane = user("jane");
        let john = user("john");

        show_dashboard(&sessions, &jane).await.expect("bootstrapped");
        toggle_facet(&sessions, &jane, toggle("Ontario"))
            .await
            .expect("toggled");

        tokio::time::advance(Duration::from_secs(30)).await;
        let kept = show_dashboard(&sessions, &jane).await.expect("still there");
        assert!(kept.pending.contains(Facet::Province, "Ontario"));

        tokio::time::advance(Duration::from_secs(61)).await;
        show_dashboard(&sessions, &john).await.expect("bootstrapped");
        {
            let live = sessions.sessions.lock().await;
            assert!(!live.contains_key("jane"));
            assert!(live.contains_key("john"));
        }

        let fresh = show_dashboard(&sessions, &jane).await.expect("bootstrapped");
        assert!(fresh.pending.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn first_actions_wait_for_bootstrap() {
        let sessions = DashboardSessions::with_debounce(SlowOptions, Duration::ZERO);
        let jane = user("jane");

        let (shown, toggled) = tokio::join!(
            show_dashboard(&sessions, &jane),
            toggle_facet(&sessions, &jane, toggle("Quebec")),
        );
        shown.expect("bootstrapped");
        let toggled = toggled.expect("toggled");

        assert!(toggled.pending.contains(Facet::Province, "Quebec"));
        assert_eq!(toggled.options.get(Facet::Province), ["Ontario", "Quebec"]);
    }
}
