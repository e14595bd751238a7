use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Server configuration.
///
/// The JWT secret is injected here and handed to the session-token signer;
/// nothing else in the process reads the environment for it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Path to the SQLite database.
    pub database_path: PathBuf,
    /// Secret used to sign session tokens. Leaving this unset falls back to
    /// a development secret with a logged warning.
    pub jwt_secret: Option<String>,
    /// Whether to mark the session cookie `Secure`.
    pub cookie_secure: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            port: 7700,
            database_path: data_dir.join("fitlog").join("fitlog.db"),
            jwt_secret: None,
            cookie_secure: false,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::Read(path.clone(), e))?;
            config = serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse(path, e))?;
        }

        if let Ok(port) = std::env::var("FITLOG_PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Ok(db_path) = std::env::var("FITLOG_DATABASE_PATH") {
            config.database_path = PathBuf::from(db_path);
        }
        if let Ok(secret) = std::env::var("FITLOG_JWT_SECRET") {
            config.jwt_secret = Some(secret);
        }
        if let Ok(secure) = std::env::var("FITLOG_COOKIE_SECURE") {
            config.cookie_secure = secure == "1" || secure.eq_ignore_ascii_case("true");
        }

        Ok(config)
    }

    /// Default config file path: ~/.config/fitlog/config.yaml
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fitlog")
            .join("config.yaml")
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}': {}", .0.display(), .1)]
    Read(PathBuf, std::io::Error),
    #[error("Failed to parse config file '{}': {}", .0.display(), .1)]
    Parse(PathBuf, serde_yaml::Error),
    #[error("Invalid FITLOG_PORT value '{0}'")]
    InvalidPort(String),
}
