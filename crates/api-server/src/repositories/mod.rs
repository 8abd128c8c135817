//! Repository layer for database access

pub mod accounts;
pub mod follows;
pub mod revoked_tokens;
pub mod users;
pub mod withdrawals;

// Re-exports
pub use accounts::AccountRepository;
pub use follows::FollowRepository;
pub use revoked_tokens::{hash_token, RevokedTokenRepository};
pub use users::UserRepository;
pub use withdrawals::WithdrawalRepository;

/// Name of the unique constraint a write tripped over, if that is why it failed
///
/// Repository errors carry `anyhow` context; the `sqlx::Error` underneath is
/// still reachable through `downcast_ref`.
pub fn unique_violation(err: &anyhow::Error) -> Option<&str> {
    match err.downcast_ref::<sqlx::Error>()? {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Some(db.constraint().unwrap_or_default())
        }
        _ => None,
    }
}
