//! Periodic maintenance
//!
//! - **Revoked token purge**: deletes revocation records whose refresh token
//!   has expired on its own, since an expired token fails verification anyway
//!
//! # Configuration
//!
//! - `REVOKED_TOKEN_PURGE_INTERVAL_SECS`: interval between purges (default: 3600)

use shared::DbPool;
use std::env;
use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::repositories::RevokedTokenRepository;

const DEFAULT_PURGE_INTERVAL_SECS: u64 = 3600;

/// Floor applied to configured intervals
const MIN_PURGE_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct BackgroundTaskConfig {
    pub purge_interval: Duration,
}

impl BackgroundTaskConfig {
    fn from_raw(raw: Option<&str>) -> Self {
        let secs = raw
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PURGE_INTERVAL_SECS)
            .max(MIN_PURGE_INTERVAL_SECS);

        Self {
            purge_interval: Duration::from_secs(secs),
        }
    }
}

impl Default for BackgroundTaskConfig {
    fn default() -> Self {
        Self::from_raw(env::var("REVOKED_TOKEN_PURGE_INTERVAL_SECS").ok().as_deref())
    }
}

pub struct BackgroundTaskRunner {
    pool: DbPool,
    config: BackgroundTaskConfig,
}

impl BackgroundTaskRunner {
    pub fn new(pool: DbPool) -> Self {
        Self::with_config(pool, BackgroundTaskConfig::default())
    }

    pub fn with_config(pool: DbPool, config: BackgroundTaskConfig) -> Self {
        Self { pool, config }
    }

    /// Spawn all tasks; cancel the returned token to stop them
    pub fn start(self) -> CancellationToken {
        let cancel_token = CancellationToken::new();

        let purge_token = cancel_token.clone();
        let purge_interval = self.config.purge_interval;
        let pool = self.pool;

        tokio::spawn(async move {
            run_revoked_token_purge(pool, purge_interval, purge_token).await;
        });

        info!(
            purge_interval_secs = purge_interval.as_secs(),
            "Background tasks started"
        );

        cancel_token
    }
}

async fn run_revoked_token_purge(
    pool: DbPool,
    purge_interval: Duration,
    cancel_token: CancellationToken,
) {
    let mut interval = interval(purge_interval);

    // First tick fires immediately
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                info!("Revoked token purge stopping due to shutdown");
                break;
            }
            _ = interval.tick() => {
                purge_expired_revocations(&pool).await;
            }
        }
    }
}

async fn purge_expired_revocations(pool: &DbPool) {
    debug!("Starting revoked token purge");

    match RevokedTokenRepository::purge_expired(pool).await {
        Ok(0) => debug!("No expired revocations to purge"),
        Ok(count) => info!(deleted_count = count, "Purged expired token revocations"),
        Err(e) => error!(error = %e, "Failed to purge expired token revocations"),
    }
}
