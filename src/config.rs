use std::path::PathBuf;

use anyhow::Context;

/// Runtime settings, read from the environment (and `.env`) once at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Directory uploaded post images are written to and served from.
    pub media_root: PathBuf,
    /// Session expiry on inactivity.
    pub session_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://yatube.db?mode=rwc".to_owned(),
            host: "0.0.0.0".to_owned(),
            port: 8080,
            media_root: PathBuf::from("media"),
            session_minutes: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match dotenv::var("YATUBE_PORT") {
            Ok(port) => port.parse().with_context(|| format!("YATUBE_PORT={port} is not a port"))?,
            Err(_) => defaults.port,
        };
        let session_minutes = match dotenv::var("YATUBE_SESSION_MINUTES") {
            Ok(minutes) => minutes
                .parse()
                .with_context(|| format!("YATUBE_SESSION_MINUTES={minutes} is not a number"))?,
            Err(_) => defaults.session_minutes,
        };

        Ok(Self {
            database_url: dotenv::var("DATABASE_URL").unwrap_or(defaults.database_url),
            host: dotenv::var("YATUBE_HOST").unwrap_or(defaults.host),
            port,
            media_root: dotenv::var("YATUBE_MEDIA_ROOT").map(PathBuf::from).unwrap_or(defaults.media_root),
            session_minutes,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
