use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Errors raised while assembling the configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in {0:?} mode")]
    MissingJwtSecret(Environment),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    pub password_hash: PasswordHashConfig,
}

/// Argon2 cost parameters used when hashing new passwords
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PasswordHashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl PasswordHashConfig {
    /// Smallest parameters argon2 accepts. Only for tests and local tooling.
    pub fn minimal() -> Self {
        Self {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        }
    }
}

impl Default for PasswordHashConfig {
    fn default() -> Self {
        // argon2id defaults (19 MiB, 2 passes)
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

const DEV_JWT_SECRET: &str = "flux-development-secret-change-me";

/// Longest accepted token lifetime (ten years)
pub const MAX_JWT_EXPIRY_DAYS: i64 = 3650;

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()?;

        config.validate()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = parse_var("PORT", &v)?;
        }
        if let Ok(v) = env::var("FRONTEND_URL") {
            self.server.frontend_url = Some(v).filter(|s| !s.trim().is_empty());
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &v)?;
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_DAYS") {
            self.security.jwt_expiry_days = parse_var("JWT_EXPIRY_DAYS", &v)?;
        }
        if let Ok(v) = env::var("PASSWORD_HASH_MEMORY_KIB") {
            self.security.password_hash.memory_kib = parse_var("PASSWORD_HASH_MEMORY_KIB", &v)?;
        }
        if let Ok(v) = env::var("PASSWORD_HASH_ITERATIONS") {
            self.security.password_hash.iterations = parse_var("PASSWORD_HASH_ITERATIONS", &v)?;
        }

        Ok(self)
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingJwtSecret(self.environment));
        }
        if !(1..=MAX_JWT_EXPIRY_DAYS).contains(&self.security.jwt_expiry_days) {
            return Err(ConfigError::InvalidValue {
                name: "JWT_EXPIRY_DAYS",
                value: self.security.jwt_expiry_days.to_string(),
            });
        }
        Ok(self)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                frontend_url: None,
            },
            database: DatabaseConfig {
                url: "sqlite://flux-music.db".to_string(),
                max_connections: 5,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_days: 30,
                password_hash: PasswordHashConfig::default(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                frontend_url: None,
            },
            database: DatabaseConfig {
                url: "sqlite://flux-music.db".to_string(),
                max_connections: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_days: 30,
                password_hash: PasswordHashConfig::default(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                frontend_url: None,
            },
            database: DatabaseConfig {
                url: "sqlite://flux-music.db".to_string(),
                max_connections: 20,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_days: 30,
                password_hash: PasswordHashConfig::default(),
            },
        }
    }

    /// In-memory database and cheap hashing, for tests
    pub fn for_tests() -> Self {
        let mut config = Self::development();
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 1;
        config.security.jwt_secret = "flux-test-secret".to_string();
        config.security.password_hash = PasswordHashConfig::minimal();
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.security.jwt_expiry_days, 30);
        assert!(!config.security.jwt_secret.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_production_config_requires_secret() {
        let config = AppConfig::production();
        assert!(config.is_production());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingJwtSecret(Environment::Production))
        ));
    }

    #[test]
    fn test_config_for_tests_uses_memory_database() {
        let config = AppConfig::for_tests();
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.database.max_connections, 1);
        assert_eq!(config.security.password_hash.iterations, 1);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        assert_eq!(parse_var::<u16>("PORT", " 8080 ").unwrap(), 8080);
        assert!(matches!(
            parse_var::<u16>("PORT", "eighty"),
            Err(ConfigError::InvalidValue { name: "PORT", .. })
        ));
    }

    #[test]
    fn test_non_positive_expiry_is_rejected() {
        let mut config = AppConfig::development();
        config.security.jwt_expiry_days = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { name: "JWT_EXPIRY_DAYS", .. })
        ));
    }

    #[test]
    fn test_huge_expiry_is_rejected() {
        for days in [MAX_JWT_EXPIRY_DAYS + 1, i64::MAX] {
            let mut config = AppConfig::development();
            config.security.jwt_expiry_days = days;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidValue { name: "JWT_EXPIRY_DAYS", .. })
            ));
        }

        let mut config = AppConfig::development();
        config.security.jwt_expiry_days = MAX_JWT_EXPIRY_DAYS;
        assert!(config.validate().is_ok());
    }
}
