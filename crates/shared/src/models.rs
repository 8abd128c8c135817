//! Data models matching the PostgreSQL database schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Public URL of the profile photo
    pub photo: Option<String>,
    pub role: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Withdrawable balance in the smallest currency unit
    pub balance: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Bank account a user can withdraw to
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BankAccount {
    pub id: String,
    pub user_id: String,
    /// Bank name or code
    pub bank: String,
    /// Account holder name
    pub name: String,
    pub number: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Withdrawal request against a user's balance
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Withdrawal {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub amount: i64,
    /// pending, completed, failed
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Follow relationship between two users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Follow {
    pub id: String,
    pub follower_id: String,
    pub following_id: String,
    pub created_at: DateTime<Utc>,
}
