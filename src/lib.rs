#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::middleware::{Compress, Logger};
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, web};

#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::repository::DieselRepository;
#[cfg(feature = "server")]
use crate::repository::source::RepositorySource;
#[cfg(feature = "server")]
use crate::routes::AppDashboards;
#[cfg(feature = "server")]
use crate::routes::api::{api_v1_advisor_facets, api_v1_advisors, api_v1_announcement, api_v1_me};
#[cfg(feature = "server")]
use crate::routes::dashboard::{
    apply_filters, load_more, refresh, reset_filters, search, sort, toggle_filter,
};
#[cfg(feature = "server")]
use crate::routes::main::{logout, show_index};

#[cfg(feature = "server")]
pub mod dashboard;
pub mod db;
pub mod domain;
#[cfg(feature = "server")]
pub mod dto;
mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
pub mod models;
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
pub mod schema;
#[cfg(feature = "server")]
pub mod services;

/// Role required to use the directory.
pub const SERVICE_ACCESS_ROLE: &str = "advisors";

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = db::establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    let repo = DieselRepository::new(pool);
    let dashboards = web::Data::new(
        AppDashboards::with_debounce(
            RepositorySource::new(repo.clone()),
            server_config.search_debounce(),
        )
        .idle_timeout(server_config.session_idle_timeout()),
    );

    // Keys and stores for identity and sessions.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!("Listening on {}:{}", bind_address.0, bind_address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", &server_config.assets_dir))
            .service(
                web::scope("/api")
                    .service(api_v1_advisors)
                    .service(api_v1_advisor_facets)
                    .service(api_v1_announcement)
                    .service(api_v1_me),
            )
            .service(
                web::scope("")
                    .wrap(crate::middleware::redirect_unauthorized(
                        server_config.login_url.clone(),
                    ))
                    .service(show_index)
                    .service(search)
                    .service(sort)
                    .service(toggle_filter)
                    .service(apply_filters)
                    .service(reset_filters)
                    .service(load_more)
                    .service(refresh)
                    .service(logout),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(dashboards.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
