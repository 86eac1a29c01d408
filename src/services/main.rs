use crate::SERVICE_ACCESS_ROLE;
use crate::dto::api::AnnouncementResponse;
use crate::dto::main::DashboardPageData;
use crate::models::auth::{AuthenticatedUser, CurrentUser};
use crate::repository::AnnouncementReader;
use crate::repository::source::AdvisorSource;
use crate::services::dashboard::{DashboardSessions, show_dashboard};
use crate::services::{ServiceResult, ensure_role};

/// Body of the latest announcement. A failed lookup hides the banner.
pub fn latest_announcement<R>(repo: &R) -> Option<String>
where
    R: AnnouncementReader + ?Sized,
{
    match repo.latest_announcement() {
        Ok(announcement) => announcement.map(|a| a.body.into_inner()),
        Err(err) => {
            log::error!("Failed to load the latest announcement: {err}");
            None
        }
    }
}

pub fn load_announcement<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<AnnouncementResponse>
where
    R: AnnouncementReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    Ok(AnnouncementResponse {
        announcement: latest_announcement(repo),
    })
}

pub fn load_current_user(user: &AuthenticatedUser) -> ServiceResult<CurrentUser> {
    ensure_role(user, SERVICE_ACCESS_ROLE)?;
    Ok(user.current_user())
}

/// Loads everything the dashboard page renders.
pub async fn load_dashboard_page<R, S>(
    repo: &R,
    sessions: &DashboardSessions<S>,
    user: &AuthenticatedUser,
) -> ServiceResult<DashboardPageData>
where
    R: AnnouncementReader + ?Sized,
    S: AdvisorSource + Clone,
{
    let view = show_dashboard(sessions, user).await?;

    Ok(DashboardPageData {
        current_user: user.current_user(),
        announcement: latest_announcement(repo),
        view,
    })
}
