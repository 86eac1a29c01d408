use std::io;

use dotenvy::dotenv;

use advisor_directory::models::config::ServerConfig;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let server_config = ServerConfig::load().map_err(|err| {
        log::error!("Failed to load configuration: {err}");
        io::Error::other(format!("Failed to load configuration: {err}"))
    })?;

    advisor_directory::run(server_config).await
}
