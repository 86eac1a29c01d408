use serde::Serialize;

use crate::dto::dashboard::DashboardView;
use crate::models::auth::CurrentUser;

/// Data required to render the dashboard page.
#[derive(Debug, Serialize)]
pub struct DashboardPageData {
    pub current_user: CurrentUser,
    /// Body of the latest announcement for the banner.
    pub announcement: Option<String>,
    pub view: DashboardView,
}
