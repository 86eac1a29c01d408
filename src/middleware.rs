//! Turns unauthorized responses into a redirect to the login entry point.

use actix_web::HttpResponse;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};

/// Error handler answering every 401 with `303 See Other` to `login_url`.
pub fn redirect_unauthorized<B: 'static>(login_url: impl Into<String>) -> ErrorHandlers<B> {
    let login_url = login_url.into();
    ErrorHandlers::new().handler(StatusCode::UNAUTHORIZED, move |res: ServiceResponse<B>| {
        let (req, _) = res.into_parts();
        let response = HttpResponse::SeeOther()
            .insert_header((header::LOCATION, login_url.as_str()))
            .finish();
        Ok(ErrorHandlerResponse::Response(
            ServiceResponse::new(req, response).map_into_right_body(),
        ))
    })
}
