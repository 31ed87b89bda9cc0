//! Configuration module for Corkboard.

use serde::Deserialize;
use std::path::Path;

use crate::board::{MAX_BOARD_DESCRIPTION_LENGTH, MAX_BOARD_NAME_LENGTH};
use crate::{ForumError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/corkboard.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file. Empty disables file logging.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/corkboard.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Session lifetime in seconds.
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
    /// Interval between expired-session sweeps, in seconds.
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
    /// Mark the cookie `Secure` (only sent over HTTPS).
    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_cookie_name() -> String {
    "sessionid".to_string()
}

fn default_session_ttl() -> u64 {
    14 * 24 * 60 * 60 // two weeks
}

fn default_cleanup_interval() -> u64 {
    3600
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_secs: default_session_ttl(),
            cleanup_interval_secs: default_cleanup_interval(),
            secure_cookie: false,
        }
    }
}

/// Site-wide forum settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ForumConfig {
    /// Forum name shown in page titles.
    #[serde(default = "default_forum_name")]
    pub name: String,
    /// Short tagline shown under the forum name.
    #[serde(default)]
    pub description: String,
    /// Timezone used when displaying timestamps (e.g., "UTC", "Europe/Berlin").
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_forum_name() -> String {
    "Corkboard".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            name: default_forum_name(),
            description: String::new(),
            timezone: default_timezone(),
        }
    }
}

/// A board that must exist once the server has started.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BoardSeed {
    /// Board name (unique).
    pub name: String,
    /// Board description.
    #[serde(default)]
    pub description: String,
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Forum settings.
    #[serde(default)]
    pub forum: ForumConfig,
    /// Boards created at startup when missing.
    #[serde(default)]
    pub boards: Vec<BoardSeed>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ForumError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ForumError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `CORKBOARD_DATABASE_PATH`: Override the database file path
    /// - `CORKBOARD_PORT`: Override the listening port
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("CORKBOARD_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(port) = std::env::var("CORKBOARD_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid CORKBOARD_PORT"),
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.session.cookie_name.trim().is_empty() {
            return Err(ForumError::Config(
                "session.cookie_name must not be empty".to_string(),
            ));
        }
        if self.session.ttl_secs == 0 {
            return Err(ForumError::Config(
                "session.ttl_secs must be greater than zero".to_string(),
            ));
        }
        if self.forum.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ForumError::Config(format!(
                "unknown timezone: {}",
                self.forum.timezone
            )));
        }
        for seed in &self.boards {
            let name_len = seed.name.chars().count();
            if name_len == 0 || name_len > MAX_BOARD_NAME_LENGTH {
                return Err(ForumError::Config(format!(
                    "board name must be 1-{MAX_BOARD_NAME_LENGTH} characters: {:?}",
                    seed.name
                )));
            }
            if seed.description.chars().count() > MAX_BOARD_DESCRIPTION_LENGTH {
                return Err(ForumError::Config(format!(
                    "description of board {:?} exceeds {MAX_BOARD_DESCRIPTION_LENGTH} characters",
                    seed.name
                )));
            }
        }
        Ok(())
    }
}
