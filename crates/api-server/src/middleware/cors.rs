//! CORS Middleware
//!
//! Builds the cross-origin policy from `ServerConfig::cors_allowed_origins`.
//!
//! - Production accepts HTTPS origins only and has no defaults
//! - Development falls back to the usual local frontend ports
//! - Wildcards are never accepted
//!
//! Credentials stay disabled: clients authenticate with bearer tokens, not
//! cookies.

use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};
use shared::AppEnv;
use tracing::{debug, warn};

use super::REFRESH_TOKEN_HEADER;

const DEV_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:8080"];

/// Create the CORS middleware for `env`
pub fn cors(configured: &[String], env: AppEnv) -> Cors {
    let allowed_origins = allowed_origins(configured, env);

    let mut cors = Cors::default();
    if allowed_origins.is_empty() {
        warn!("No valid CORS origins configured. Cross-origin requests will be blocked.");
    }
    for origin in &allowed_origins {
        debug!("CORS: Allowing origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }

    cors.allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static(REFRESH_TOKEN_HEADER),
        ])
        .expose_headers(vec![header::CONTENT_TYPE])
        .max_age(3600)
}

/// Resolve the effective origin list, dropping anything unsafe for `env`
fn allowed_origins(configured: &[String], env: AppEnv) -> Vec<String> {
    let production = env.is_production();

    if configured.is_empty() {
        if production {
            warn!("CORS_ALLOWED_ORIGINS not set in production; CORS is disabled");
            return Vec::new();
        }
        return DEV_ORIGINS.iter().map(|s| s.to_string()).collect();
    }

    configured
        .iter()
        .filter(|origin| {
            if origin.as_str() == "*" {
                warn!("Wildcard (*) origin is not allowed; list explicit origins instead");
                return false;
            }
            if production && !origin.starts_with("https://") {
                warn!("Rejecting non-HTTPS origin in production: {}", origin);
                return false;
            }
            if !origin.starts_with("http://") && !origin.starts_with("https://") {
                warn!("Invalid origin format: {}", origin);
                return false;
            }
            true
        })
        .cloned()
        .collect()
}
