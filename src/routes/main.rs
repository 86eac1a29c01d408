use actix_identity::Identity;
use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, post, web};

use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{AppDashboards, service_error_response};
use crate::services::main as main_service;

#[get("/")]
pub async fn show_index(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    sessions: web::Data<AppDashboards>,
) -> impl Responder {
    match main_service::load_dashboard_page(repo.get_ref(), sessions.get_ref(), &user).await {
        Ok(data) => HttpResponse::Ok().json(data),
        Err(err) => service_error_response(err),
    }
}

#[post("/logout")]
pub async fn logout(
    identity: Identity,
    user: Option<AuthenticatedUser>,
    sessions: web::Data<AppDashboards>,
) -> impl Responder {
    if let Some(user) = user {
        sessions.end(&user).await;
    }
    identity.logout();
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}
