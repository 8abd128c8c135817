//! Configuration management using environment variables
//!
//! The whole configuration is read once at process start by [`Config::from_env`]
//! and passed explicitly to every component that needs it.
//!
//! # Security
//!
//! - `JWT_SECRET_KEY` and `JWT_REFRESH_KEY` must each be at least 32 characters
//! - Production builds reject weak, default, or low-entropy secrets
//! - Access and refresh secrets must differ
//! - Development builds warn but allow weaker secrets for testing

use crate::error::{Error, Result};
use serde::Deserialize;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

/// Default access token lifetime (1 hour)
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 3600;

/// Default refresh token lifetime (30 days)
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 30 * 24 * 3600;

/// Minimum secret length (256 bits)
const MIN_SECRET_LEN: usize = 32;

/// Known weak/default patterns that should never be used in production
const WEAK_PATTERNS: &[&str] = &[
    "dev_secret",
    "change_me",
    "changeme",
    "example",
    "secret",
    "password",
    "test",
    "default",
    "your_secret",
    "your-secret",
    "jwt_secret",
    "jwt-secret",
];

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub payment: PaymentGatewayConfig,
    pub model: ModelConfig,
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnv {
    Development,
    Staging,
    Production,
}

impl AppEnv {
    pub fn is_production(&self) -> bool {
        matches!(self, AppEnv::Production)
    }
}

impl FromStr for AppEnv {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(AppEnv::Development),
            "staging" => Ok(AppEnv::Staging),
            "production" | "prod" => Ok(AppEnv::Production),
            other => Err(Error::config(format!("Invalid APP_ENV: {}", other))),
        }
    }
}

/// Application identity
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub env: AppEnv,
    /// Public base URL of this service
    pub url: String,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Origins allowed to make cross-origin requests
    pub cors_allowed_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection string; takes precedence over the individual parts
    pub url: Option<String>,

    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to keep warm
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,

    /// Options: disable, allow, prefer, require, verify-ca, verify-full
    pub ssl_mode: String,
}

impl DatabaseConfig {
    /// Build a PostgreSQL connection URL
    pub fn connection_url(&self) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }

        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, self.name, self.ssl_mode
        )
    }
}

/// Token signing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret used to sign access tokens
    pub access_secret: String,

    /// Secret used to sign refresh tokens (must differ from the access secret)
    pub refresh_secret: String,

    /// HMAC algorithm name (HS256, HS384, HS512)
    pub algorithm: String,

    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

/// S3 object storage credentials
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    /// Public base URL objects are served from
    pub public_url: String,
}

/// Payment gateway keys for both environments
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentGatewayConfig {
    pub server_key_sandbox: String,
    pub client_key_sandbox: String,
    pub server_key_production: String,
    pub client_key_production: String,
    pub url_sandbox: String,
    pub url_production: String,
}

/// Credentials selected for the running environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayCredentials<'a> {
    pub server_key: &'a str,
    pub client_key: &'a str,
    pub base_url: &'a str,
}

impl PaymentGatewayConfig {
    /// Production keys in production, sandbox keys everywhere else
    pub fn credentials(&self, env: AppEnv) -> GatewayCredentials<'_> {
        if env.is_production() {
            GatewayCredentials {
                server_key: &self.server_key_production,
                client_key: &self.client_key_production,
                base_url: &self.url_production,
            }
        } else {
            GatewayCredentials {
                server_key: &self.server_key_sandbox,
                client_key: &self.client_key_sandbox,
                base_url: &self.url_sandbox,
            }
        }
    }
}

/// Machine learning model artefact location
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub pre_trained_model: PathBuf,
}

impl ModelConfig {
    pub fn is_available(&self) -> bool {
        self.pre_trained_model.is_file()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let env_name = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let access_secret = Self::load_jwt_secret(
            "JWT_SECRET_KEY",
            "dev_access_secret_change_in_production_32chars",
        )?;
        let refresh_secret = Self::load_jwt_secret(
            "JWT_REFRESH_KEY",
            "dev_refresh_secret_change_in_production_32chars",
        )?;
        ensure_distinct_secrets(&access_secret, &refresh_secret, !cfg!(debug_assertions))?;

        let algorithm = env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string());
        validate_algorithm(&algorithm)?;

        Ok(Self {
            app: AppConfig {
                name: env::var("APP_NAME").unwrap_or_else(|_| "user-account-api".to_string()),
                env: env_name.parse()?,
                url: env::var("APP_URL").unwrap_or_else(|_| "http://localhost:8080".to_string()),
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env("SERVER_PORT", 8080)?,
                cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .map(|raw| split_list(&raw))
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DB_CONN").ok().filter(|s| !s.is_empty()),
                host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: parse_env("DB_PORT", 5432)?,
                name: env::var("DB_NAME").unwrap_or_else(|_| "user_accounts".to_string()),
                user: env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
                password: env::var("DB_PASS").map_err(|_| Error::config("DB_PASS must be set"))?,
                max_connections: parse_env("DB_MAX_CONNECTIONS", 50)?,
                min_connections: parse_env("DB_MIN_CONNECTIONS", 5)?,
                acquire_timeout_secs: parse_env("DB_ACQUIRE_TIMEOUT", 5)?,
                idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT", 180)?,
                max_lifetime_secs: parse_env("DB_MAX_LIFETIME", 900)?,
                ssl_mode: env::var("DB_SSL_MODE").unwrap_or_else(|_| {
                    if cfg!(debug_assertions) {
                        "prefer".to_string()
                    } else {
                        "verify-full".to_string()
                    }
                }),
            },
            jwt: JwtConfig {
                access_secret,
                refresh_secret,
                algorithm,
                access_ttl_secs: parse_env("JWT_ACCESS_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?,
                refresh_ttl_secs: parse_env("JWT_REFRESH_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?,
            },
            storage: StorageConfig {
                access_key_id: env::var("AWS_ACCESS_KEY_ID").unwrap_or_default(),
                secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
                region: env::var("AWS_REGION_NAME").unwrap_or_else(|_| "us-east-1".to_string()),
                bucket: env::var("AWS_BUCKET").unwrap_or_default(),
                public_url: env::var("AWS_URL").unwrap_or_default(),
            },
            payment: PaymentGatewayConfig {
                server_key_sandbox: env::var("SERVER_KEY_SANDBOX").unwrap_or_default(),
                client_key_sandbox: env::var("CLIENT_KEY_SANDBOX").unwrap_or_default(),
                server_key_production: env::var("SERVER_KEY_PRODUCTION").unwrap_or_default(),
                client_key_production: env::var("CLIENT_KEY_PRODUCTION").unwrap_or_default(),
                url_sandbox: env::var("URL_SANDBOX").unwrap_or_default(),
                url_production: env::var("URL_PRODUCTION").unwrap_or_default(),
            },
            model: ModelConfig {
                pre_trained_model: env::var("PRE_TRAINED_MODEL")
                    .unwrap_or_else(|_| "models/pre_trained.bin".to_string())
                    .into(),
            },
        })
    }

    /// Load a JWT secret and run the security checks on it
    ///
    /// Release builds require the variable; debug builds fall back to a
    /// development default and only log the problems they find.
    fn load_jwt_secret(var: &str, dev_default: &str) -> Result<String> {
        let secret = if cfg!(debug_assertions) {
            env::var(var).unwrap_or_else(|_| {
                tracing::warn!(
                    "{} not set - using development default. DO NOT use in production!",
                    var
                );
                dev_default.to_string()
            })
        } else {
            env::var(var).map_err(|_| {
                Error::config(format!("{} environment variable must be set in production", var))
            })?
        };

        if let Err(e) = validate_jwt_secret(var, &secret) {
            if cfg!(debug_assertions) {
                tracing::error!(
                    "{}. This is acceptable in development but MUST be changed for production!",
                    e
                );
            } else {
                return Err(e);
            }
        }

        Ok(secret)
    }
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env<T>(var: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(var) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::config(format!("Invalid {}: {}", var, e))),
        Err(_) => Ok(default),
    }
}

/// Split a comma-separated list, dropping blanks
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Check a signing secret for length, weak patterns and entropy
pub fn validate_jwt_secret(var: &str, secret: &str) -> Result<()> {
    if secret.len() < MIN_SECRET_LEN {
        return Err(Error::config(format!(
            "{} must be at least {} characters (256 bits of entropy). \
             Current length: {} characters. \
             Generate a secure secret with: openssl rand -base64 32",
            var,
            MIN_SECRET_LEN,
            secret.len()
        )));
    }

    let secret_lower = secret.to_lowercase();
    if let Some(pattern) = WEAK_PATTERNS.iter().find(|p| secret_lower.contains(*p)) {
        return Err(Error::config(format!(
            "{} contains weak pattern '{}'. \
             Use a cryptographically secure random value.",
            var, pattern
        )));
    }

    let unique_chars: std::collections::HashSet<char> = secret.chars().collect();
    if unique_chars.len() < 10 {
        return Err(Error::config(format!(
            "{} has low entropy (too few unique characters)",
            var
        )));
    }

    Ok(())
}

/// Access and refresh tokens must not share a key
fn ensure_distinct_secrets(access: &str, refresh: &str, strict: bool) -> Result<()> {
    if access != refresh {
        return Ok(());
    }
    if strict {
        return Err(Error::config(
            "JWT_SECRET_KEY and JWT_REFRESH_KEY must be different",
        ));
    }
    tracing::warn!("JWT_SECRET_KEY and JWT_REFRESH_KEY are identical");
    Ok(())
}

/// Only HMAC algorithms can be used with shared secrets
pub fn validate_algorithm(algorithm: &str) -> Result<()> {
    match algorithm {
        "HS256" | "HS384" | "HS512" => Ok(()),
        other => Err(Error::config(format!(
            "Unsupported JWT_ALGORITHM '{}': expected HS256, HS384 or HS512",
            other
        ))),
    }
}
