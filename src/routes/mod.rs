//! HTTP handlers. Page and dashboard routes answer JSON and sit behind the
//! login redirect; the `/api` routes answer 401 instead.

use actix_web::HttpResponse;
use serde_json::json;

use crate::dashboard::DashboardError;
use crate::repository::DieselRepository;
use crate::repository::source::RepositorySource;
use crate::services::ServiceError;
use crate::services::dashboard::DashboardSessions;

pub mod api;
pub mod dashboard;
pub mod main;

/// Dashboard sessions backed by the application database.
pub type AppDashboards = DashboardSessions<RepositorySource<DieselRepository>>;

/// Maps a service failure onto an HTTP response.
pub fn service_error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized
        | ServiceError::Dashboard(DashboardError::AuthenticationRequired) => {
            HttpResponse::Unauthorized().finish()
        }
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        err @ (ServiceError::Repository(_) | ServiceError::Dashboard(_)) => {
            log::error!("Request failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
