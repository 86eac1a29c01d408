//! Configuration model loaded from external sources.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
const DEFAULT_SESSION_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

fn default_session_idle_timeout_secs() -> u64 {
    DEFAULT_SESSION_IDLE_TIMEOUT_SECS
}

fn default_login_url() -> String {
    "/auth/signin".to_string()
}

fn default_assets_dir() -> String {
    "./assets".to_string()
}

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub database_url: String,
    /// HS256 secret shared with the identity provider.
    pub secret: String,
    /// Login entry point unauthenticated users are redirected to.
    #[serde(default = "default_login_url")]
    pub login_url: String,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Dashboards untouched for this long are dropped.
    #[serde(default = "default_session_idle_timeout_secs")]
    pub session_idle_timeout_secs: u64,
}

impl ServerConfig {
    /// Loads `config/default.yaml` (when present) overlaid with `APP__*`
    /// environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("APP").prefix_separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }
}
