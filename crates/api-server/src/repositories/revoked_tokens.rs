//! Revoked Refresh Token Repository
//!
//! Refresh tokens are stateless until logout. On logout the SHA-256 hash of
//! the token is stored here until its natural expiry, and token refresh
//! rejects any hash found in this table. Raw tokens are never stored.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use shared::DbPool;

pub struct RevokedTokenRepository;

/// Hash a refresh token using SHA-256 (hex encoded)
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

impl RevokedTokenRepository {
    /// Revoke a token; `false` when it was already revoked
    ///
    /// The primary key on `token_hash` makes this the single arbiter when two
    /// requests race to revoke the same token.
    pub async fn revoke(
        pool: &DbPool,
        user_id: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO revoked_refresh_tokens (token_hash, user_id, expires_at, revoked_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (token_hash) DO NOTHING
            "#,
        )
        .bind(token_hash)
        .bind(user_id)
        .bind(expires_at)
        .execute(pool)
        .await
        .context("Failed to revoke refresh token")?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn is_revoked(pool: &DbPool, token_hash: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM revoked_refresh_tokens WHERE token_hash = $1)
            "#,
        )
        .bind(token_hash)
        .fetch_one(pool)
        .await
        .context("Failed to check revoked refresh token")?;

        Ok(result)
    }

    /// Drop records whose token has expired on its own
    pub async fn purge_expired(pool: &DbPool) -> Result<u64> {
        let result = sqlx::query("DELETE FROM revoked_refresh_tokens WHERE expires_at < NOW()")
            .execute(pool)
            .await
            .context("Failed to purge expired revocations")?;

        Ok(result.rows_affected())
    }
}
