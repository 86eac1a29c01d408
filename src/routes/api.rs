use actix_web::{HttpRequest, HttpResponse, Responder, get, web};

use crate::dto::api::AdvisorsQuery;
use crate::forms::FormError;
use crate::forms::api::AdvisorsQueryParams;
use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::service_error_response;
use crate::services::{advisors as advisors_service, main as main_service};

fn parse_query(req: &HttpRequest) -> Result<AdvisorsQuery, FormError> {
    AdvisorsQueryParams::from_query_string(req.query_string())?.try_into()
}

#[get("/v1/advisors")]
pub async fn api_v1_advisors(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match parse_query(&req) {
        Ok(query) => query,
        Err(err) => return service_error_response(err.into()),
    };

    match advisors_service::list_advisors(repo.get_ref(), &user, query) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => service_error_response(err),
    }
}

#[get("/v1/advisors/facets")]
pub async fn api_v1_advisor_facets(
    req: HttpRequest,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let query = match parse_query(&req) {
        Ok(query) => query,
        Err(err) => return service_error_response(err.into()),
    };

    match advisors_service::list_facet_values(repo.get_ref(), &user, &query.filters) {
        Ok(options) => HttpResponse::Ok().json(options),
        Err(err) => service_error_response(err),
    }
}

#[get("/v1/announcement")]
pub async fn api_v1_announcement(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match main_service::load_announcement(repo.get_ref(), &user) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(err) => service_error_response(err),
    }
}

#[get("/v1/me")]
pub async fn api_v1_me(user: AuthenticatedUser) -> impl Responder {
    match main_service::load_current_user(&user) {
        Ok(current_user) => HttpResponse::Ok().json(current_user),
        Err(err) => service_error_response(err),
    }
}
