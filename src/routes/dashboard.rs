use actix_web::{HttpResponse, Responder, post, web};

use crate::dto::dashboard::DashboardView;
use crate::forms::dashboard::{SearchForm, SortForm, ToggleFacetForm};
use crate::models::auth::AuthenticatedUser;
use crate::routes::{AppDashboards, service_error_response};
use crate::services::ServiceResult;
use crate::services::dashboard as dashboard_service;

fn respond(result: ServiceResult<DashboardView>) -> HttpResponse {
    match result {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(err) => service_error_response(err),
    }
}

#[post("/dashboard/search")]
pub async fn search(
    user: AuthenticatedUser,
    sessions: web::Data<AppDashboards>,
    web::Json(form): web::Json<SearchForm>,
) -> impl Responder {
    respond(dashboard_service::search(sessions.get_ref(), &user, form).await)
}

#[post("/dashboard/sort")]
pub async fn sort(
    user: AuthenticatedUser,
    sessions: web::Data<AppDashboards>,
    web::Json(form): web::Json<SortForm>,
) -> impl Responder {
    respond(dashboard_service::sort(sessions.get_ref(), &user, form).await)
}

#[post("/dashboard/filters/toggle")]
pub async fn toggle_filter(
    user: AuthenticatedUser,
    sessions: web::Data<AppDashboards>,
    web::Json(form): web::Json<ToggleFacetForm>,
) -> impl Responder {
    respond(dashboard_service::toggle_facet(sessions.get_ref(), &user, form).await)
}

#[post("/dashboard/filters/apply")]
pub async fn apply_filters(
    user: AuthenticatedUser,
    sessions: web::Data<AppDashboards>,
) -> impl Responder {
    respond(dashboard_service::apply_filters(sessions.get_ref(), &user).await)
}

#[post("/dashboard/filters/reset")]
pub async fn reset_filters(
    user: AuthenticatedUser,
    sessions: web::Data<AppDashboards>,
) -> impl Responder {
    respond(dashboard_service::reset_filters(sessions.get_ref(), &user).await)
}

#[post("/dashboard/more")]
pub async fn load_more(
    user: AuthenticatedUser,
    sessions: web::Data<AppDashboards>,
) -> impl Responder {
    respond(dashboard_service::load_more(sessions.get_ref(), &user).await)
}

#[post("/dashboard/refresh")]
pub async fn refresh(
    user: AuthenticatedUser,
    sessions: web::Data<AppDashboards>,
) -> impl Responder {
    respond(dashboard_service::refresh(sessions.get_ref(), &user).await)
}
