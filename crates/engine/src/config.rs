//! Engine configuration from environment variables.

use std::str::FromStr;

use eragenetica_domain::UserId;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid port '{0}'")]
    InvalidPort(String),

    #[error("Unknown store backend '{0}' (expected 'sqlite' or 'memory')")]
    UnknownBackend(String),

    #[error("Invalid admin user id in ADMIN_USER_IDS")]
    InvalidAdminId,
}

/// Where character and admin settings documents live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    pub store_backend: StoreBackend,
    pub store_db: String,
    pub admin_user_ids: Vec<UserId>,
    /// `*` or a comma-separated origin list. `None` disables CORS.
    pub cors_allowed_origins: Option<String>,
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let server_port: u16 = match lookup("SERVER_PORT").or_else(|| lookup("PORT")) {
            Some(port) => port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port))?,
            None => 3000,
        };
        let store_backend = match lookup("STORE_BACKEND") {
            Some(backend) => backend.parse()?,
            None => StoreBackend::Sqlite,
        };
        let store_db = lookup("STORE_DB").unwrap_or_else(|| "eragenetica.db".into());
        let admin_user_ids = lookup("ADMIN_USER_IDS")
            .map(|ids| parse_admin_ids(&ids))
            .transpose()?
            .unwrap_or_default();
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(Self {
            server_host,
            server_port,
            store_backend,
            store_db,
            admin_user_ids,
            cors_allowed_origins,
        })
    }
}

fn parse_admin_ids(raw: &str) -> Result<Vec<UserId>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| UserId::new(s).map_err(|_| ConfigError::InvalidAdminId))
        .collect()
}
