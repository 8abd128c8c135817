//! Withdrawal repository

use anyhow::{Context, Result};
use shared::models::Withdrawal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

pub struct WithdrawalRepository;

impl WithdrawalRepository {
    /// Record a pending withdrawal (call inside the balance-debit transaction)
    pub async fn create<'e, E>(
        executor: E,
        user_id: &str,
        account_id: &str,
        amount: i64,
    ) -> Result<Withdrawal>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let id = Uuid::new_v4().to_string();

        let withdrawal = sqlx::query_as::<_, Withdrawal>(
            r#"
            INSERT INTO withdrawals (id, user_id, account_id, amount, status, created_at)
            VALUES ($1, $2, $3, $4, 'pending', NOW())
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(account_id)
        .bind(amount)
        .fetch_one(executor)
        .await
        .context("Failed to create withdrawal")?;

        Ok(withdrawal)
    }
}
