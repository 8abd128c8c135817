//! Shared library for the user account backend
//!
//! This crate provides common functionality used by the API server:
//! - Database connection pooling and utilities
//! - Data models matching the PostgreSQL schema
//! - Domain error types
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod db;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{AppEnv, Config};
pub use db::DbPool;
pub use error::{Error, Result};

/// Initialize tracing subscriber for structured logging
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shared=debug,api_server=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
