use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub session_inactivity_minutes: i64,
    pub secure_cookies: bool,
}

impl Config {
    /// Reads the environment (and `.env`, if present). Unset keys fall back to
    /// defaults, unparsable ones are an error.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            database_url: try_load("DATABASE_URL", "sqlite://studybud.db")?,
            host: try_load("HOST", "0.0.0.0")?,
            port: try_load("PORT", "8080")?,
            db_max_connections: try_load("DB_MAX_CONNECTIONS", "16")?,
            session_inactivity_minutes: try_load("SESSION_INACTIVITY_MINUTES", "60")?,
            secure_cookies: try_load("SECURE_COOKIES", "false")?,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_owned(),
            host: "127.0.0.1".to_owned(),
            port: 8080,
            db_max_connections: 1,
            session_inactivity_minutes: 60,
            secure_cookies: false,
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    });

    raw.parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {raw}"))
}
