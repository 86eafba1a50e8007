//! Application configuration management
//!
//! Configuration is loaded from environment variables (and `.env`) once at
//! startup and validated before the server binds.

use std::env;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_JWT_EXPIRY_DAYS, DEFAULT_MAIL_FROM,
    DEFAULT_MAIL_TIMEOUT_SECONDS, DEFAULT_RESEND_API_URL, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, MEMORY_DATABASE_SCHEME,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// `json` switches the log output to JSON lines
    pub log_format: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration. Rate limiting is off when no URL is set.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: Option<String>,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_days: i64,
}

/// Outbound email configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub from: String,
    pub timeout_seconds: u64,
}

/// Reads one variable; `None` when unset
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(&|key| env::var(key).ok())
    }

    fn from_lookup(var: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_lookup(var)?,
            database: DatabaseConfig::from_lookup(var)?,
            redis: RedisConfig::from_lookup(var),
            jwt: JwtConfig::from_lookup(var)?,
            mail: MailConfig::from_lookup(var)?,
        })
    }
}

fn parse_or<T: FromStr>(var: Lookup<'_>, key: &str, default: T) -> Result<T, ConfigError> {
    match var(key) {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

fn required(var: Lookup<'_>, key: &str) -> Result<String, ConfigError> {
    var(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

/// Unset and blank both mean absent
fn optional(var: Lookup<'_>, key: &str) -> Option<String> {
    var(key).filter(|value| !value.trim().is_empty())
}

impl ServerConfig {
    fn from_lookup(var: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: var("SERVER_HOST").unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string()),
            port: parse_or(var, "SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format: var("LOG_FORMAT").unwrap_or_else(|| "pretty".to_string()),
        })
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

impl DatabaseConfig {
    fn from_lookup(var: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            url: required(var, "DATABASE_URL")?,
            max_connections: parse_or(
                var,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            )?,
        })
    }

    /// Whether the in-process store was requested instead of Postgres
    pub fn is_memory(&self) -> bool {
        self.url.starts_with(MEMORY_DATABASE_SCHEME)
    }
}

impl RedisConfig {
    fn from_lookup(var: Lookup<'_>) -> Self {
        Self {
            url: optional(var, "REDIS_URL"),
        }
    }
}

impl JwtConfig {
    fn from_lookup(var: Lookup<'_>) -> Result<Self, ConfigError> {
        let secret = required(var, "JWT_SECRET")?;
        if secret.is_empty() {
            return Err(ConfigError::InvalidValue("JWT_SECRET".to_string()));
        }

        Ok(Self {
            secret,
            expiry_days: parse_or(var, "JWT_EXPIRY_DAYS", DEFAULT_JWT_EXPIRY_DAYS)?,
        })
    }
}

impl MailConfig {
    fn from_lookup(var: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: optional(var, "RESEND_API_KEY"),
            api_url: var("RESEND_API_URL").unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_string()),
            from: var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            timeout_seconds: parse_or(var, "MAIL_TIMEOUT_SECONDS", DEFAULT_MAIL_TIMEOUT_SECONDS)?,
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            rust_log: "debug".to_string(),
            log_format: "pretty".to_string(),
        },
        database: DatabaseConfig {
            url: MEMORY_DATABASE_SCHEME.to_string(),
            max_connections: 1,
        },
        redis: RedisConfig { url: None },
        jwt: JwtConfig {
            secret: "test-secret-do-not-use".to_string(),
            expiry_days: DEFAULT_JWT_EXPIRY_DAYS,
        },
        mail: MailConfig {
            api_key: None,
            api_url: DEFAULT_RESEND_API_URL.to_string(),
            from: DEFAULT_MAIL_FROM.to_string(),
            timeout_seconds: DEFAULT_MAIL_TIMEOUT_SECONDS,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(&|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/eventdesk"),
            ("JWT_SECRET", "secret"),
        ])
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server.rust_log, "info");
        assert!(!config.server.json_logs());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.redis.url, None);
        assert_eq!(config.jwt.expiry_days, 30);
        assert_eq!(config.mail.api_key, None);
        assert_eq!(config.mail.api_url, "https://api.resend.com");
        assert_eq!(config.mail.from, "MUES Events <onboarding@resend.dev>");
        assert_eq!(config.mail.timeout_seconds, 10);
    }

    #[test]
    fn test_overrides_and_errors() {
        let config = load(&[
            ("DATABASE_URL", "memory://"),
            ("JWT_SECRET", "secret"),
            ("SERVER_PORT", "8080"),
            ("LOG_FORMAT", "JSON"),
            ("REDIS_URL", "  "),
            ("RESEND_API_KEY", "re_123"),
        ])
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.server.json_logs());
        assert!(config.database.is_memory());
        assert_eq!(config.redis.url, None);
        assert_eq!(config.mail.api_key.as_deref(), Some("re_123"));

        assert!(matches!(
            load(&[("JWT_SECRET", "secret")]),
            Err(ConfigError::Missing(key)) if key == "DATABASE_URL"
        ));
        assert!(matches!(
            load(&[("DATABASE_URL", "memory://"), ("JWT_SECRET", "")]),
            Err(ConfigError::InvalidValue(key)) if key == "JWT_SECRET"
        ));
        assert!(matches!(
            load(&[
                ("DATABASE_URL", "memory://"),
                ("JWT_SECRET", "secret"),
                ("SERVER_PORT", "http"),
            ]),
            Err(ConfigError::InvalidValue(key)) if key == "SERVER_PORT"
        ));
    }

    #[test]
    fn test_memory_scheme_detection() {
        let mut database = test_config().database;
        assert!(database.is_memory());

        database.url = "postgres://localhost/eventdesk".to_string();
        assert!(!database.is_memory());
    }
}
