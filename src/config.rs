use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};

/// Placeholder secret used when `SESSION_SECRET` is unset. Never deploy with it.
pub const DEFAULT_SESSION_SECRET: &str = "your-secret-key";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub session_secret: String,
    pub app_env: String,
    pub database_url: String,
    pub loglevel: String,
    pub session_ttl_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            session_secret: DEFAULT_SESSION_SECRET.to_string(),
            app_env: "development".to_string(),
            database_url: "sqlite:recruitment.db".to_string(),
            loglevel: "info".to_string(),
            session_ttl_minutes: 24 * 60,
        }
    }
}

impl Config {
    /// Defaults overlaid with the process environment.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::raw().only(&[
            "HOST",
            "PORT",
            "SESSION_SECRET",
            "APP_ENV",
            "DATABASE_URL",
            "LOGLEVEL",
            "SESSION_TTL_MINUTES",
        ]))
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    pub fn uses_default_secret(&self) -> bool {
        self.session_secret == DEFAULT_SESSION_SECRET
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
