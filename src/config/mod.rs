use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub sessions: SessionConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

/// The single operator account. Both values are required at startup and have
/// no defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub ttl_hours: u64,
    pub secure_cookies: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub upload_limit_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let mut config = match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        };

        // The admin credential pair has no default in any environment
        config.admin.username =
            env::var("ADMIN_USERNAME").map_err(|_| ConfigError::MissingVar("ADMIN_USERNAME"))?;
        config.admin.password =
            env::var("ADMIN_PASSWORD").map_err(|_| ConfigError::MissingVar("ADMIN_PASSWORD"))?;

        Ok(config.with_env_overrides())
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides; PORT is the deployment-platform fallback
        if let Ok(v) = env::var("ESTATE_API_PORT").or_else(|_| env::var("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Session overrides
        if let Ok(v) = env::var("SESSION_TTL_HOURS") {
            self.sessions.ttl_hours = v.parse().unwrap_or(self.sessions.ttl_hours);
        }
        if let Ok(v) = env::var("SESSION_SECURE_COOKIES") {
            self.sessions.secure_cookies = v.parse().unwrap_or(self.sessions.secure_cookies);
        }

        // Storage overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.storage.database_url = v;
        }
        if let Ok(v) = env::var("UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("UPLOAD_LIMIT_BYTES") {
            self.storage.upload_limit_bytes = v.parse().unwrap_or(self.storage.upload_limit_bytes);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 5500 },
            admin: AdminConfig {
                username: String::new(),
                password: String::new(),
            },
            sessions: SessionConfig {
                ttl_hours: 24 * 7,
                secure_cookies: false,
            },
            storage: StorageConfig {
                database_url: "sqlite://estate.db".to_string(),
                upload_dir: PathBuf::from("uploads"),
                upload_limit_bytes: 80_000,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 5500 },
            admin: AdminConfig {
                username: String::new(),
                password: String::new(),
            },
            sessions: SessionConfig {
                ttl_hours: 12,
                secure_cookies: true,
            },
            storage: StorageConfig {
                database_url: "sqlite:///var/lib/estate-api/estate.db".to_string(),
                upload_dir: PathBuf::from("/var/lib/estate-api/uploads"),
                upload_limit_bytes: 80_000,
            },
        }
    }
}
