//! Bank account repository

use anyhow::{Context, Result};
use shared::models::BankAccount;
use shared::DbPool;
use uuid::Uuid;

use crate::models::AccountFilter;

pub struct AccountRepository;

/// `ILIKE` patterns for each filter, `None` when the filter is absent
struct FilterPatterns {
    bank: Option<String>,
    name: Option<String>,
    number: Option<String>,
}

impl From<&AccountFilter> for FilterPatterns {
    fn from(filter: &AccountFilter) -> Self {
        Self {
            bank: filter.bank.as_deref().map(contains_pattern),
            name: filter.name.as_deref().map(contains_pattern),
            number: filter.number.as_deref().map(contains_pattern),
        }
    }
}

/// Substring pattern with LIKE wildcards in the input escaped
fn contains_pattern(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

impl AccountRepository {
    /// Create a bank account for a user
    pub async fn create(
        pool: &DbPool,
        user_id: &str,
        bank: &str,
        name: &str,
        number: &str,
    ) -> Result<BankAccount> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now();

        let account = sqlx::query_as::<_, BankAccount>(
            r#"
            INSERT INTO bank_accounts (id, user_id, bank, name, number, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(bank)
        .bind(name)
        .bind(number)
        .bind(now)
        .fetch_one(pool)
        .await
        .context("Failed to create bank account")?;

        Ok(account)
    }

    /// Find bank account by ID regardless of owner
    pub async fn find_by_id(pool: &DbPool, account_id: &str) -> Result<Option<BankAccount>> {
        let account = sqlx::query_as::<_, BankAccount>(
            r#"
            SELECT * FROM bank_accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id)
        .fetch_optional(pool)
        .await
        .context("Failed to find bank account")?;

        Ok(account)
    }

    /// List a user's bank accounts matching `filter`, newest first
    pub async fn list_by_user(
        pool: &DbPool,
        user_id: &str,
        filter: &AccountFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BankAccount>> {
        let patterns = FilterPatterns::from(filter);

        let accounts = sqlx::query_as::<_, BankAccount>(
            r#"
            SELECT * FROM bank_accounts
            WHERE user_id = $1
              AND ($2::text IS NULL OR bank ILIKE $2)
              AND ($3::text IS NULL OR name ILIKE $3)
              AND ($4::text IS NULL OR number LIKE $4)
            ORDER BY created_at DESC, id
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(user_id)
        .bind(patterns.bank)
        .bind(patterns.name)
        .bind(patterns.number)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list bank accounts")?;

        Ok(accounts)
    }

    /// Count a user's bank accounts matching `filter`
    pub async fn count_by_user(pool: &DbPool, user_id: &str, filter: &AccountFilter) -> Result<i64> {
        let patterns = FilterPatterns::from(filter);

        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM bank_accounts
            WHERE user_id = $1
              AND ($2::text IS NULL OR bank ILIKE $2)
              AND ($3::text IS NULL OR name ILIKE $3)
              AND ($4::text IS NULL OR number LIKE $4)
            "#,
        )
        .bind(user_id)
        .bind(patterns.bank)
        .bind(patterns.name)
        .bind(patterns.number)
        .fetch_one(pool)
        .await
        .context("Failed to count bank accounts")?;

        Ok(count)
    }

    /// Partial update; `None` keeps the stored value
    pub async fn update(
        pool: &DbPool,
        account_id: &str,
        bank: Option<&str>,
        name: Option<&str>,
        number: Option<&str>,
    ) -> Result<Option<BankAccount>> {
        let account = sqlx::query_as::<_, BankAccount>(
            r#"
            UPDATE bank_accounts
            SET bank = COALESCE($2, bank),
                name = COALESCE($3, name),
                number = COALESCE($4, number),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(account_id)
        .bind(bank)
        .bind(name)
        .bind(number)
        .fetch_optional(pool)
        .await
        .context("Failed to update bank account")?;

        Ok(account)
    }

    /// Delete a bank account; returns whether a row was removed
    pub async fn delete(pool: &DbPool, account_id: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM bank_accounts
            WHERE id = $1
            "#,
        )
        .bind(account_id)
        .execute(pool)
        .await
        .context("Failed to delete bank account")?;

        Ok(result.rows_affected() > 0)
    }
}
